pub mod band;
pub mod distance;
pub mod interpolate;
pub mod projection;
pub mod sampler;

pub use band::build_band;
pub use distance::{distance_meters, format_distance, path_length_meters};
pub use interpolate::interpolate;
pub use projection::{project, project_path, unproject};
pub use sampler::{PathSample, offset_by_depth, sample_at};
