pub mod geojson;
pub mod triangulation;

pub use geojson::{scene_to_geojson, write_geojson};
pub use triangulation::triangulate_band;
