//! Tick-driven front simulation
//!
//! [`Simulation`] owns every mutable scalar (progress, readiness, supply,
//! organization, strength, the game clock). Geometry is never cached:
//! [`Simulation::snapshot`] rebuilds it from the current records.

pub mod log;
pub mod orders;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::config::SimulationConfig;
use crate::config::tuning::*;
use crate::domain::{Division, DivisionStatus, Front, FrontState, Scenario};
use crate::layers::{DivisionView, FrontGeometry, build_front_geometries, derive_division_views};

pub use log::{BattleLog, LogEntry, Severity};
pub use orders::{DivisionOrder, OrderError};

/// Renderable state at one instant
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time: DateTime<Utc>,
    pub fronts: Vec<FrontGeometry>,
    pub divisions: Vec<DivisionView>,
}

/// Headline numbers for the sidebar, rounded percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub friendly_divisions: usize,
    pub enemy_divisions: usize,
    pub average_friendly_strength: u32,
    pub average_readiness: u32,
    pub average_supply: u32,
}

pub struct Simulation {
    fronts: Vec<Front>,
    divisions: Vec<Division>,
    clock: DateTime<Utc>,
    speed: f64,
    paused: bool,
    config: SimulationConfig,
    /// Which milestone thresholds each front has already announced
    milestones: HashMap<String, [bool; MILESTONES.len()]>,
    log: BattleLog,
    ticks: u64,
}

impl Simulation {
    pub fn new(scenario: Scenario, config: SimulationConfig) -> Self {

        let mut log = BattleLog::new(config.log_capacity);
        log.push(
            scenario.start_time,
            Severity::Info,
            "Headquarters established. Monitoring of the front line has begun.",
        );

        Self {
            fronts: scenario.fronts,
            divisions: scenario.divisions,
            clock: scenario.start_time,
            speed: 1.0,
            paused: false,
            config,
            milestones: HashMap::new(),
            log,
            ticks: 0,
        }
    }

    pub fn fronts(&self) -> &[Front] {
        &self.fronts
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn front(&self, id: &str) -> Option<&Front> {
        self.fronts.iter().find(|f| f.id == id)
    }

    pub fn division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the speed multiplier; must be positive and finite
    pub fn set_speed(&mut self, speed: f64) -> Result<(), OrderError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(OrderError::InvalidSpeed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advance every advancing front and wear down the divisions on it
    ///
    /// # Returns
    /// Ids of the fronts that moved this tick
    pub fn tick(&mut self) -> Vec<String> {
        if self.paused {
            return Vec::new();
        }
        self.ticks += 1;

        let mut advanced = Vec::new();
        let mut messages = Vec::new();

        for front in &mut self.fronts {
            if front.state != FrontState::Advancing || front.progress >= 1.0 {
                continue;
            }

            let readiness_factor = (front.readiness / 100.0).max(READINESS_FLOOR);
            let supply_factor = (front.supply / 100.0).max(SUPPLY_FLOOR);
            let momentum =
                self.config.base_momentum * self.speed * readiness_factor * supply_factor;

            front.progress = (front.progress + momentum).min(1.0);
            front.readiness = (front.readiness - momentum * READINESS_LOSS).max(0.0);
            front.supply = (front.supply - momentum * SUPPLY_LOSS).max(0.0);
            front.reported_losses += momentum * LOSSES_PER_MOMENTUM;

            if front.progress >= 1.0 {
                front.state = FrontState::Secured;
                messages.push(format!(
                    "Front \"{}\" has achieved its objective: {}.",
                    front.display_name(),
                    front.objective
                ));
            } else if front.readiness < STALL_THRESHOLD || front.supply < STALL_THRESHOLD {
                front.state = FrontState::Stalled;
                messages.push(format!(
                    "The advance of \"{}\" has halted: units are exhausted.",
                    front.display_name()
                ));
            }

            let reached = self
                .milestones
                .entry(front.id.clone())
                .or_insert([false; MILESTONES.len()]);
            for (threshold, seen) in MILESTONES.iter().zip(reached.iter_mut()) {
                if front.progress >= *threshold && !*seen {
                    *seen = true;
                    messages.push(format!(
                        "\"{}\" has covered {:.0}% of the way to its objective ({}).",
                        front.display_name(),
                        threshold * 100.0,
                        front.objective
                    ));
                }
            }

            advanced.push(front.id.clone());
        }

        if !advanced.is_empty() {
            self.wear_down_divisions(&advanced);
        }

        for message in messages {
            self.log.push(self.clock, Severity::Info, message);
        }

        advanced
    }

    fn wear_down_divisions(&mut self, advanced: &[String]) {
        let advanced: HashSet<&str> = advanced.iter().map(String::as_str).collect();

        for division in &mut self.divisions {
            let on_moving_front = division
                .assignment
                .as_ref()
                .is_some_and(|a| advanced.contains(a.front_id.as_str()));
            if !on_moving_front {
                continue;
            }

            let friendly = division.is_friendly();
            let (org_loss, strength_loss) = if friendly {
                (FRIENDLY_ORG_LOSS, FRIENDLY_STRENGTH_LOSS)
            } else {
                (ENEMY_ORG_LOSS, ENEMY_STRENGTH_LOSS)
            };

            division.organization = (division.organization - org_loss * self.speed).max(0.0);
            division.strength = (division.strength - strength_loss * self.speed).max(0.0);

            if division.organization < EXHAUSTED_BELOW {
                division.status = DivisionStatus::Exhausted;
            } else if friendly && division.status == DivisionStatus::Reserve {
                division.status = DivisionStatus::Frontline;
            } else if !friendly && division.organization < PROBING_BELOW {
                division.status = DivisionStatus::Probing;
            }
        }
    }

    /// Move the game clock forward by one clock tick
    pub fn advance_clock(&mut self) {
        if self.paused {
            return;
        }
        let seconds = (self.config.tick_minutes * 60.0 * self.speed).round() as i64;
        self.clock += Duration::seconds(seconds);
    }

    /// Recompute all geometry from the current records
    pub fn snapshot(&self) -> Snapshot {
        let fronts = build_front_geometries(&self.fronts);
        let divisions = derive_division_views(&self.divisions, &fronts);

        Snapshot {
            time: self.clock,
            fronts,
            divisions,
        }
    }

    pub fn summary(&self) -> Summary {
        let friendly: Vec<&Division> = self.divisions.iter().filter(|d| d.is_friendly()).collect();

        Summary {
            friendly_divisions: friendly.len(),
            enemy_divisions: self.divisions.len() - friendly.len(),
            average_friendly_strength: rounded_mean(friendly.iter().map(|d| d.strength)),
            average_readiness: rounded_mean(self.fronts.iter().map(|f| f.readiness)),
            average_supply: rounded_mean(self.fronts.iter().map(|f| f.supply)),
        }
    }

    fn front_mut(&mut self, id: &str) -> Result<&mut Front, OrderError> {
        self.fronts
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| OrderError::UnknownFront(id.to_string()))
    }

    /// Sync milestone flags with a front's current progress
    fn reset_milestones(&mut self, id: &str, progress: f64) {
        self.milestones
            .insert(id.to_string(), reached_milestones(progress));
    }
}

fn reached_milestones(progress: f64) -> [bool; MILESTONES.len()] {
    MILESTONES.map(|threshold| progress >= threshold)
}

fn rounded_mean(values: impl Iterator<Item = f64>) -> u32 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0
    } else {
        (sum / count as f64).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assignment, Faction, GeoPoint};

    fn scenario() -> Scenario {
        let path = vec![GeoPoint::new(52.0, 23.0), GeoPoint::new(51.5, 23.5)];
        let target = vec![GeoPoint::new(52.1, 23.4), GeoPoint::new(51.6, 23.9)];

        let mut advancing = Front::new("center", path.clone(), target.clone())
            .with_state(FrontState::Advancing)
            .with_progress(0.2);
        advancing.readiness = 80.0;
        advancing.supply = 60.0;

        let idle = Front::new("south", path, target).with_progress(0.1);

        let mut reserve = Division::new("res", Faction::Friendly, GeoPoint::new(52.0, 22.0))
            .with_assignment(Assignment::new("center", 0.5, -5000.0));
        reserve.status = DivisionStatus::Reserve;
        let mut enemy = Division::new("enemy", Faction::Enemy, GeoPoint::new(52.0, 24.0))
            .with_assignment(Assignment::new("center", 0.5, 5000.0));
        enemy.organization = 45.5;
        let bystander = Division::new("idle", Faction::Friendly, GeoPoint::new(49.0, 22.0))
            .with_assignment(Assignment::new("south", 0.5, -5000.0));

        Scenario {
            fronts: vec![advancing, idle],
            divisions: vec![reserve, enemy, bystander],
            ..Scenario::default()
        }
    }

    #[test]
    fn test_tick_advances_only_advancing_fronts() {
        let mut sim = Simulation::new(scenario(), SimulationConfig::default());
        let advanced = sim.tick();

        assert_eq!(advanced, vec!["center".to_string()]);

        let momentum = 0.012 * 0.8 * 0.6;
        let center = sim.front("center").unwrap();
        assert!((center.progress - (0.2 + momentum)).abs() < 1e-12);
        assert!((center.readiness - (80.0 - momentum * 140.0)).abs() < 1e-9);
        assert!((center.supply - (60.0 - momentum * 95.0)).abs() < 1e-9);
        assert!((center.reported_losses - momentum * 2200.0).abs() < 1e-9);
        assert_eq!(sim.front("south").unwrap().progress, 0.1);
    }

    #[test]
    fn test_tick_wears_down_assigned_divisions() {
        let mut sim = Simulation::new(scenario(), SimulationConfig::default());
        sim.tick();

        let reserve = sim.division("res").unwrap();
        assert_eq!(reserve.status, DivisionStatus::Frontline);
        assert!((reserve.organization - 98.5).abs() < 1e-9);
        assert!((reserve.strength - 99.4).abs() < 1e-9);

        let enemy = sim.division("enemy").unwrap();
        assert_eq!(enemy.status, DivisionStatus::Probing);
        assert!((enemy.organization - 44.4).abs() < 1e-9);

        let bystander = sim.division("idle").unwrap();
        assert_eq!(bystander.organization, 100.0);
    }

    #[test]
    fn test_front_secures_objective() {
        let mut scenario = scenario();
        scenario.fronts[0].progress = 0.999;
        let mut sim = Simulation::new(scenario, SimulationConfig::default());
        sim.tick();

        let center = sim.front("center").unwrap();
        assert_eq!(center.progress, 1.0);
        assert_eq!(center.state, FrontState::Secured);
        assert!(
            sim.log()
                .entries()
                .any(|e| e.message.contains("achieved its objective"))
        );

        // A secured front no longer moves
        assert!(sim.tick().is_empty());
    }

    #[test]
    fn test_front_stalls_when_exhausted() {
        let mut scenario = scenario();
        scenario.fronts[0].supply = 18.1;
        let mut sim = Simulation::new(scenario, SimulationConfig::default());
        sim.tick();

        assert_eq!(sim.front("center").unwrap().state, FrontState::Stalled);
    }

    #[test]
    fn test_milestones_announced_once() {
        let mut scenario = scenario();
        scenario.fronts[0].progress = 0.245;
        let mut sim = Simulation::new(scenario, SimulationConfig::default());

        let before = sim.log().len();
        sim.tick();
        assert_eq!(sim.log().len(), before + 1);
        assert!(sim.log().latest().unwrap().message.contains("25%"));

        sim.tick();
        assert_eq!(sim.log().len(), before + 1);
    }

    #[test]
    fn test_starting_progress_announces_passed_milestones() {
        let mut scenario = scenario();
        scenario.fronts[0].progress = 0.32;
        let mut sim = Simulation::new(scenario, SimulationConfig::default());

        let before = sim.log().len();
        sim.tick();
        assert_eq!(sim.log().len(), before + 1);
        assert!(sim.log().latest().unwrap().message.contains("25%"));

        sim.tick();
        assert_eq!(sim.log().len(), before + 1);
    }

    #[test]
    fn test_launch_resyncs_milestones() {
        let mut scenario = scenario();
        scenario.fronts[0].progress = 0.6;
        scenario.fronts[0].state = FrontState::Idle;
        let mut sim = Simulation::new(scenario, SimulationConfig::default());
        assert!(sim.launch_offensive("center").unwrap());

        let before = sim.log().len();
        sim.tick();
        assert_eq!(sim.log().len(), before);
    }

    #[test]
    fn test_pause_stops_everything() {
        let mut sim = Simulation::new(scenario(), SimulationConfig::default());
        let start = sim.clock();
        sim.toggle_pause();

        assert!(sim.tick().is_empty());
        sim.advance_clock();
        assert_eq!(sim.clock(), start);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_clock_scales_with_speed() {
        let mut sim = Simulation::new(scenario(), SimulationConfig::default());
        let start = sim.clock();
        sim.set_speed(2.0).unwrap();
        sim.advance_clock();

        assert_eq!(sim.clock() - start, Duration::minutes(180));
        assert!(sim.set_speed(0.0).is_err());
        assert!(sim.set_speed(f64::NAN).is_err());
    }

    #[test]
    fn test_snapshot_recomputes_geometry() {
        let mut sim = Simulation::new(scenario(), SimulationConfig::default());
        let before = sim.snapshot();
        sim.tick();
        let after = sim.snapshot();

        assert_eq!(before.fronts.len(), 2);
        assert_ne!(before.fronts[0].path, after.fronts[0].path);
        assert_eq!(before.fronts[1].path, after.fronts[1].path);
        assert_eq!(after.divisions.len(), 3);
    }

    #[test]
    fn test_summary() {
        let sim = Simulation::new(scenario(), SimulationConfig::default());
        let summary = sim.summary();

        assert_eq!(summary.friendly_divisions, 2);
        assert_eq!(summary.enemy_divisions, 1);
        assert_eq!(summary.average_friendly_strength, 100);
        assert_eq!(summary.average_readiness, 90);
        assert_eq!(summary.average_supply, 80);

        let empty = Simulation::new(Scenario::default(), SimulationConfig::default());
        assert_eq!(empty.summary().average_readiness, 0);
    }
}
