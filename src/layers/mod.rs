pub mod divisions;
pub mod fronts;

pub use divisions::{DivisionView, derive_division_position, derive_division_views};
pub use fronts::{FrontGeometry, build_front_geometries, build_front_geometry};
