//! Thermal hysteresis controller for the cooling pair.
//!
//! ```text
//!          Off                deadband                On
//!   ──────────────┤ goal-margin ······· goal+margin ├──────────
//!                 ▲ switch off                      ▲ switch on
//! ```
//!
//! Inside the deadband the previous state is kept, so readings that
//! jitter around the goal never chatter the output.

use super::ActuatorState;
use crate::config::ThermalConfig;

/// Pure deadband rule.
///
/// `measured >= upper` → `On`, `measured <= lower` → `Off`, otherwise
/// `previous`.  A `Toggle` previous state is treated as `Off`.
pub fn hysteresis(cfg: &ThermalConfig, measured_centi: i32, previous: ActuatorState) -> ActuatorState {
    if measured_centi >= cfg.upper_centi() {
        ActuatorState::On
    } else if measured_centi <= cfg.lower_centi() {
        ActuatorState::Off
    } else if previous == ActuatorState::On {
        ActuatorState::On
    } else {
        ActuatorState::Off
    }
}

/// Output edge, reported once when the state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    SwitchedOn,
    SwitchedOff,
}

/// One controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermalDecision {
    pub state: ActuatorState,
    /// `Some` only on the tick the state changed.
    pub transition: Option<Transition>,
}

/// Stateful wrapper around [`hysteresis`] that remembers the last state.
#[derive(Debug, Default)]
pub struct ThermalController {
    state: ActuatorState,
}

impl ThermalController {
    /// Starts `Off`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    /// Feed one measurement.  `None` (no reading yet) keeps the state.
    pub fn update(&mut self, cfg: &ThermalConfig, measured_centi: Option<i32>) -> ThermalDecision {
        let previous = self.state;
        let next = match measured_centi {
            Some(t) => hysteresis(cfg, t, previous),
            None => previous,
        };
        self.state = next;

        let transition = match (previous, next) {
            (ActuatorState::On, ActuatorState::On) | (ActuatorState::Off, ActuatorState::Off) => None,
            (_, ActuatorState::On) => Some(Transition::SwitchedOn),
            (_, _) => Some(Transition::SwitchedOff),
        };
        ThermalDecision {
            state: next,
            transition,
        }
    }
}
