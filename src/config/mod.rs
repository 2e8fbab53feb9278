use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Tuning constants for the tick simulation.
///
/// Rates are per tick at speed 1.0 and scale linearly with speed.
/// Readiness, supply, organization and strength are all percentages.
pub mod tuning {
    /// Progress thresholds announced once each in the battle log
    pub const MILESTONES: [f64; 3] = [0.25, 0.5, 0.75];

    /// Readiness/supply factors never drop below these floors
    pub const READINESS_FLOOR: f64 = 0.45;
    pub const SUPPLY_FLOOR: f64 = 0.5;

    /// Cost of one unit of momentum
    pub const READINESS_LOSS: f64 = 140.0;
    pub const SUPPLY_LOSS: f64 = 95.0;
    pub const LOSSES_PER_MOMENTUM: f64 = 2200.0;

    /// Below either of these an advance stalls
    pub const STALL_THRESHOLD: f64 = 18.0;
    /// An offensive needs more than this readiness and supply
    pub const LAUNCH_THRESHOLD: f64 = 25.0;
    /// Progress an offensive starts from at least
    pub const LAUNCH_MIN_PROGRESS: f64 = 0.02;

    pub const FRIENDLY_ORG_LOSS: f64 = 1.5;
    pub const ENEMY_ORG_LOSS: f64 = 1.1;
    pub const FRIENDLY_STRENGTH_LOSS: f64 = 0.6;
    pub const ENEMY_STRENGTH_LOSS: f64 = 0.9;

    /// Organization below which a division is exhausted
    pub const EXHAUSTED_BELOW: f64 = 25.0;
    /// Enemy organization below which it switches to probing
    pub const PROBING_BELOW: f64 = 45.0;
}

fn default_base_momentum() -> f64 {
    0.012
}
fn default_tick_minutes() -> f64 {
    90.0
}
fn default_log_capacity() -> usize {
    9
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Progress gained per tick at full readiness and supply
    #[serde(default = "default_base_momentum")]
    pub base_momentum: f64,
    /// Game minutes per clock tick at speed 1.0
    #[serde(default = "default_tick_minutes")]
    pub tick_minutes: f64,
    /// Battle log entries kept
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_momentum: default_base_momentum(),
            tick_minutes: default_tick_minutes(),
            log_capacity: default_log_capacity(),
        }
    }
}

fn default_fetch_urls() -> Vec<String> {
    Vec::new()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// HTTP settings for fetching scenario snapshots
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FetchConfig {
    /// Mirrors tried after the primary URL, in order
    #[serde(default = "default_fetch_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            urls: default_fetch_urls(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_ticks() -> u32 {
    10
}
fn default_speed() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub triangles: bool,
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
}

impl FileConfig {
    /// Read and parse one config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// First parseable file from the standard search locations
    pub fn load() -> Option<Self> {
        Self::load_first(&search_paths())
    }

    /// Unparseable files are reported and skipped, missing ones are ignored
    fn load_first(candidates: &[PathBuf]) -> Option<Self> {
        candidates
            .iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    eprintln!("Warning: {:#}", e);
                    None
                }
            })
    }
}

/// Working directory first, then the per-user config and home directories
fn search_paths() -> Vec<PathBuf> {
    let local = ["frontline.toml", ".frontline.toml"].map(PathBuf::from);
    let user_config = dirs::config_dir()
        .into_iter()
        .flat_map(|dir| [dir.join("frontline").join("config.toml"), dir.join("frontline.toml")]);
    let home = dirs::home_dir().into_iter().flat_map(|home| {
        [
            home.join(".frontline.toml"),
            home.join(".config").join("frontline").join("config.toml"),
        ]
    });

    local.into_iter().chain(user_config).chain(home).collect()
}
