pub mod division;
pub mod front;
pub mod geo;
pub mod scenario;

pub use division::{Assignment, DEFAULT_LOGISTICS, Division, DivisionKind, DivisionStatus, Faction};
pub use front::{Front, FrontState};
pub use geo::{GeoPoint, PlanarPoint};
pub use scenario::{Scenario, ScenarioError};
