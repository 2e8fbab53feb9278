use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::{Division, Front};

const BUILTIN_SCENARIO: &str = include_str!("../../scenarios/builtin.toml");

/// Structural problems that make a scenario unusable
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("front #{0} has an empty id")]
    EmptyFrontId(usize),
    #[error("division #{0} has an empty id")]
    EmptyDivisionId(usize),
    #[error("duplicate front id `{0}`")]
    DuplicateFront(String),
    #[error("duplicate division id `{0}`")]
    DuplicateDivision(String),
    #[error("front `{0}` has an empty start path")]
    EmptyStartPath(String),
    #[error("front `{id}` has a non-finite {field}")]
    NonFiniteFront { id: String, field: &'static str },
    #[error("division `{id}` has a non-finite {field}")]
    NonFiniteDivision { id: String, field: &'static str },
}

fn default_start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1941, 10, 12, 5, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Complete set of records the simulation starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_start_time", alias = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub fronts: Vec<Front>,
    #[serde(default)]
    pub divisions: Vec<Division>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            fronts: Vec::new(),
            divisions: Vec::new(),
        }
    }
}

impl Scenario {
    /// The embedded three-front theatre
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SCENARIO).context("Built-in scenario is malformed")
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse scenario TOML")
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse scenario JSON")
    }

    /// Load a scenario file, choosing the format by extension (`.json` or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
        .with_context(|| format!("Invalid scenario file: {}", path.display()))
    }

    /// Check ids, paths and numeric fields
    ///
    /// Assignments to unknown fronts are not an error: those divisions
    /// fall back to their static position. See [`Scenario::dangling_assignments`].
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut front_ids = HashSet::new();
        for (index, front) in self.fronts.iter().enumerate() {
            if front.id.is_empty() {
                return Err(ScenarioError::EmptyFrontId(index));
            }
            if !front_ids.insert(front.id.as_str()) {
                return Err(ScenarioError::DuplicateFront(front.id.clone()));
            }
            if front.start_path.is_empty() {
                return Err(ScenarioError::EmptyStartPath(front.id.clone()));
            }

            let non_finite = |field| ScenarioError::NonFiniteFront {
                id: front.id.clone(),
                field,
            };
            if !front.progress.is_finite() {
                return Err(non_finite("progress"));
            }
            if !front.width.is_finite() {
                return Err(non_finite("width"));
            }
            if !front.readiness.is_finite() || !front.supply.is_finite() {
                return Err(non_finite("readiness or supply"));
            }
            let paths_finite = front
                .start_path
                .iter()
                .chain(&front.advance_path)
                .all(|p| p.is_finite());
            if !paths_finite {
                return Err(non_finite("path coordinate"));
            }
        }

        let mut division_ids = HashSet::new();
        for (index, division) in self.divisions.iter().enumerate() {
            if division.id.is_empty() {
                return Err(ScenarioError::EmptyDivisionId(index));
            }
            if !division_ids.insert(division.id.as_str()) {
                return Err(ScenarioError::DuplicateDivision(division.id.clone()));
            }

            let non_finite = |field| ScenarioError::NonFiniteDivision {
                id: division.id.clone(),
                field,
            };
            if !division.position.is_finite() {
                return Err(non_finite("position"));
            }
            if let Some(assignment) = &division.assignment {
                if !assignment.anchor.is_finite() {
                    return Err(non_finite("anchor"));
                }
                if !assignment.depth.is_finite() {
                    return Err(non_finite("depth"));
                }
            }
        }

        Ok(())
    }

    /// Ids of divisions assigned to a front that does not exist
    pub fn dangling_assignments(&self) -> Vec<&str> {
        self.divisions
            .iter()
            .filter(|d| {
                d.assignment
                    .as_ref()
                    .is_some_and(|a| !self.fronts.iter().any(|f| f.id == a.front_id))
            })
            .map(|d| d.id.as_str())
            .collect()
    }
}
