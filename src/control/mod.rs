//! Actuator decision logic.
//!
//! - [`lighting`]: stateless schedule decision per tick.
//! - [`thermal`]: hysteresis controller for the cooling pair.
//!
//! Both return an [`ActuatorState`]; the control loop maps it onto the
//! actuator port.

pub mod lighting;
pub mod thermal;

use core::fmt;

use embedded_hal::digital::PinState;

/// Commanded output state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActuatorState {
    #[default]
    Off,
    On,
    /// Invert whatever level the output is physically at.
    Toggle,
}

impl ActuatorState {
    /// Explicit pin level for `On`/`Off`; `None` for `Toggle`.
    pub fn level(self) -> Option<PinState> {
        match self {
            Self::Off => Some(PinState::Low),
            Self::On => Some(PinState::High),
            Self::Toggle => None,
        }
    }

    /// State equivalent to a physical pin level.
    pub fn from_level(level: PinState) -> Self {
        match level {
            PinState::High => Self::On,
            PinState::Low => Self::Off,
        }
    }

    /// Log-column label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
