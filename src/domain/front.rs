use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Operational state of a front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontState {
    #[default]
    Idle,
    Preparing,
    Advancing,
    Regrouping,
    Stalled,
    Secured,
}

fn default_width() -> f64 {
    12000.0
}
fn default_scalar() -> f64 {
    100.0
}

/// A front line moving from `start_path` toward `advance_path`
///
/// The two paths are paired waypoint by waypoint; `progress` blends
/// between them. Readiness and supply are percentages in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Front {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Band width in projected meters
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(alias = "startPath")]
    pub start_path: Vec<GeoPoint>,
    #[serde(default, alias = "advancePath")]
    pub advance_path: Vec<GeoPoint>,
    #[serde(default)]
    pub state: FrontState,
    #[serde(default)]
    pub progress: f64,
    #[serde(default = "default_scalar")]
    pub readiness: f64,
    #[serde(default = "default_scalar")]
    pub supply: f64,
    #[serde(default, alias = "reportedLosses")]
    pub reported_losses: f64,
    #[serde(default)]
    pub commander: Option<String>,
    #[serde(default)]
    pub doctrine: Option<String>,
    #[serde(default)]
    pub intel: Option<String>,
}

impl Front {
    pub fn new(
        id: impl Into<String>,
        start_path: Vec<GeoPoint>,
        advance_path: Vec<GeoPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            objective: String::new(),
            color: None,
            width: default_width(),
            start_path,
            advance_path,
            state: FrontState::Idle,
            progress: 0.0,
            readiness: default_scalar(),
            supply: default_scalar(),
            reported_losses: 0.0,
            commander: None,
            doctrine: None,
            intel: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_state(mut self, state: FrontState) -> Self {
        self.state = state;
        self
    }

    /// Human-readable label, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_defaults_from_json() {
        let json = r#"{
            "id": "north",
            "startPath": [{"lat": 53.16, "lng": 23.22}, {"lat": 52.82, "lng": 23.85}],
            "advancePath": [{"lat": 53.28, "lng": 23.8}],
            "state": "advancing"
        }"#;
        let front: Front = serde_json::from_str(json).unwrap();

        assert_eq!(front.state, FrontState::Advancing);
        assert_eq!(front.start_path.len(), 2);
        assert_eq!(front.advance_path.len(), 1);
        assert_eq!(front.width, 12000.0);
        assert_eq!(front.readiness, 100.0);
        assert_eq!(front.display_name(), "north");
    }
}
