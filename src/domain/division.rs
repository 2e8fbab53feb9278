use serde::{Deserialize, Serialize};

use super::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Friendly,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivisionKind {
    Armor,
    #[default]
    Infantry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivisionStatus {
    Frontline,
    #[default]
    Reserve,
    Attacking,
    Reorganizing,
    Resupplying,
    Entrenched,
    Probing,
    Exhausted,
}

/// Logistics level assumed when a division record carries none
pub const DEFAULT_LOGISTICS: f64 = 70.0;

fn default_anchor() -> f64 {
    0.5
}
fn default_depth() -> f64 {
    -4000.0
}

/// Placement of a division relative to a front line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(alias = "frontId")]
    pub front_id: String,
    /// Fraction of the front's arc length, 0 to 1
    #[serde(default = "default_anchor")]
    pub anchor: f64,
    /// Signed perpendicular distance from the line in projected meters
    #[serde(default = "default_depth")]
    pub depth: f64,
}

impl Assignment {
    pub fn new(front_id: impl Into<String>, anchor: f64, depth: f64) -> Self {
        Self {
            front_id: front_id.into(),
            anchor,
            depth,
        }
    }
}

fn default_scalar() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub faction: Faction,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: DivisionKind,
    #[serde(default = "default_scalar")]
    pub strength: f64,
    #[serde(default = "default_scalar")]
    pub organization: f64,
    #[serde(default)]
    pub logistics: Option<f64>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub commander: Option<String>,
    #[serde(default)]
    pub status: DivisionStatus,
    #[serde(default)]
    pub assignment: Option<Assignment>,
    /// Static position used when the division is not placed on a front
    pub position: GeoPoint,
}

impl Division {
    pub fn new(id: impl Into<String>, faction: Faction, position: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            faction,
            kind: DivisionKind::default(),
            strength: default_scalar(),
            organization: default_scalar(),
            logistics: None,
            experience: None,
            commander: None,
            status: DivisionStatus::default(),
            assignment: None,
            position,
        }
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = Some(assignment);
        self
    }

    pub fn is_friendly(&self) -> bool {
        self.faction == Faction::Friendly
    }

    /// Whether this division is placed on the given front
    pub fn is_assigned_to(&self, front_id: &str) -> bool {
        self.assignment
            .as_ref()
            .is_some_and(|a| a.front_id == front_id)
    }

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
    fn test_assignment_defaults() {
        let json = r#"{"frontId": "center"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.front_id, "center");
        assert_eq!(assignment.anchor, 0.5);
        assert_eq!(assignment.depth, -4000.0);
    }

    #[test]
    fn test_division_from_json() {
        let json = r#"{
            "id": "enemy-4",
            "faction": "enemy",
            "type": "armor",
            "status": "probing",
            "assignment": null,
            "position": {"lat": 52.18, "lng": 25.12}
        }"#;
        let division: Division = serde_json::from_str(json).unwrap();

        assert_eq!(division.kind, DivisionKind::Armor);
        assert_eq!(division.status, DivisionStatus::Probing);
        assert!(division.assignment.is_none());
        assert!(!division.is_friendly());
        assert!(!division.is_assigned_to("center"));
    }
}
