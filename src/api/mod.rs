pub mod scenario;

pub use scenario::fetch_scenario;
