use std::str::FromStr;
use thiserror::Error;

use super::{Severity, Simulation};
use crate::config::tuning::{LAUNCH_MIN_PROGRESS, LAUNCH_THRESHOLD};
use crate::domain::{DEFAULT_LOGISTICS, Division, DivisionStatus, Faction, FrontState};

#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error("no front with id `{0}`")]
    UnknownFront(String),
    #[error("no division with id `{0}`")]
    UnknownDivision(String),
    #[error("speed must be a positive number, got {0}")]
    InvalidSpeed(f64),
    #[error("unknown division order `{0}` (expected airstrike, support, fallback or resupply)")]
    UnknownOrder(String),
}

/// Orders that target a single division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionOrder {
    /// Enemy divisions only
    Airstrike,
    Support,
    Fallback,
    Resupply,
}

impl FromStr for DivisionOrder {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "airstrike" => Ok(DivisionOrder::Airstrike),
            "support" => Ok(DivisionOrder::Support),
            "fallback" => Ok(DivisionOrder::Fallback),
            "resupply" => Ok(DivisionOrder::Resupply),
            _ => Err(OrderError::UnknownOrder(s.to_string())),
        }
    }
}

fn percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

impl Simulation {
    /// Start an offensive on a front
    ///
    /// # Returns
    /// * `Ok(true)` - The front is now advancing
    /// * `Ok(false)` - Readiness or supply too low; the front stalls instead
    pub fn launch_offensive(&mut self, front_id: &str) -> Result<bool, OrderError> {
        let front = self.front_mut(front_id)?;

        if front.readiness <= LAUNCH_THRESHOLD || front.supply <= LAUNCH_THRESHOLD {
            front.state = FrontState::Stalled;
            self.log.push(
                self.clock,
                Severity::Warning,
                "Offensive impossible: supply and regrouping are required.",
            );
            return Ok(false);
        }

        front.state = FrontState::Advancing;
        front.progress = front.progress.max(LAUNCH_MIN_PROGRESS);
        let progress = front.progress;
        let objective = front.objective.clone();
        self.reset_milestones(front_id, progress);

        self.for_friendly_on(front_id, |division| {
            division.status = DivisionStatus::Attacking;
            division.organization = percent(division.organization - 2.5);
        });

        self.log.push(
            self.clock,
            Severity::Success,
            format!("Offensive launched: {}.", objective),
        );
        Ok(true)
    }

    /// Halt an advance so units can regroup
    pub fn pause_front(&mut self, front_id: &str) -> Result<(), OrderError> {
        let front = self.front_mut(front_id)?;
        front.state = FrontState::Regrouping;
        front.readiness = percent(front.readiness + 6.0);
        front.supply = percent(front.supply + 8.0);

        self.for_friendly_on(front_id, |division| {
            division.status = DivisionStatus::Reorganizing;
            division.organization = percent(division.organization + 3.5);
        });

        self.log.push(
            self.clock,
            Severity::Info,
            "Advance halted. Units are being put in order.",
        );
        Ok(())
    }

    /// Send extra supply columns to a front
    pub fn resupply_front(&mut self, front_id: &str) -> Result<(), OrderError> {
        let front = self.front_mut(front_id)?;
        front.state = FrontState::Preparing;
        front.readiness = percent(front.readiness + 12.0);
        front.supply = percent(front.supply + 18.0);

        self.for_friendly_on(front_id, |division| {
            division.status = DivisionStatus::Resupplying;
            division.organization = percent(division.organization + 4.5);
            division.logistics =
                Some(percent(division.logistics.unwrap_or(DEFAULT_LOGISTICS) + 3.0));
        });

        self.log.push(
            self.clock,
            Severity::Success,
            "Additional supply columns dispatched to the front.",
        );
        Ok(())
    }

    /// Fortify a front: readiness up, supply slightly down
    pub fn dig_in_front(&mut self, front_id: &str) -> Result<(), OrderError> {
        let front = self.front_mut(front_id)?;
        front.state = FrontState::Idle;
        front.readiness = percent(front.readiness + 9.0);
        front.supply = percent(front.supply - 4.0);

        self.log.push(
            self.clock,
            Severity::Info,
            "Engineer battalions are strengthening the sector's defences.",
        );
        Ok(())
    }

    /// Pause an advancing front, otherwise try to launch an offensive
    pub fn toggle_front(&mut self, front_id: &str) -> Result<(), OrderError> {
        let advancing = self
            .front(front_id)
            .ok_or_else(|| OrderError::UnknownFront(front_id.to_string()))?
            .state
            == FrontState::Advancing;

        if advancing {
            self.pause_front(front_id)
        } else {
            self.launch_offensive(front_id).map(|_| ())
        }
    }

    /// Issue an order to a single division
    ///
    /// # Returns
    /// `Ok(false)` when the order does not apply to that division's faction
    pub fn order_division(
        &mut self,
        division_id: &str,
        order: DivisionOrder,
    ) -> Result<bool, OrderError> {
        let division = self
            .divisions
            .iter_mut()
            .find(|d| d.id == division_id)
            .ok_or_else(|| OrderError::UnknownDivision(division_id.to_string()))?;

        let message = match (division.faction, order) {
            (Faction::Enemy, DivisionOrder::Airstrike) => {
                division.organization = percent(division.organization - 12.0);
                division.strength = percent(division.strength - 4.0);
                division.status = DivisionStatus::Entrenched;
                (Severity::Success, format!("Aircraft struck {}.", division.display_name()))
            }
            (Faction::Enemy, _) | (Faction::Friendly, DivisionOrder::Airstrike) => {
                return Ok(false);
            }
            (Faction::Friendly, DivisionOrder::Support) => {
                division.status = DivisionStatus::Attacking;
                division.organization = percent(division.organization - 6.0);
                if let Some(assignment) = &mut division.assignment {
                    assignment.depth = (assignment.depth - 800.0).min(-2600.0);
                }
                (
                    Severity::Success,
                    format!(
                        "{} reinforces the attack on the forward edge.",
                        division.display_name()
                    ),
                )
            }
            (Faction::Friendly, DivisionOrder::Fallback) => {
                division.status = DivisionStatus::Reserve;
                division.organization = percent(division.organization + 12.0);
                division.strength = percent(division.strength + 4.0);
                if let Some(assignment) = &mut division.assignment {
                    assignment.depth = -9200.0;
                }
                (
                    Severity::Warning,
                    format!(
                        "{} is pulled back into reserve to recover.",
                        division.display_name()
                    ),
                )
            }
            (Faction::Friendly, DivisionOrder::Resupply) => {
                division.status = DivisionStatus::Resupplying;
                division.organization = percent(division.organization + 9.0);
                division.strength = percent(division.strength + 2.0);
                division.logistics =
                    Some(percent(division.logistics.unwrap_or(DEFAULT_LOGISTICS) + 5.0));
                (
                    Severity::Info,
                    format!("{} receives supply priority.", division.display_name()),
                )
            }
        };

        let (severity, text) = message;
        self.log.push(self.clock, severity, text);
        Ok(true)
    }

    fn for_friendly_on(&mut self, front_id: &str, mut apply: impl FnMut(&mut Division)) {
        self.divisions
            .iter_mut()
            .filter(|d| d.is_friendly() && d.is_assigned_to(front_id))
            .for_each(|d| apply(d));
    }
}
