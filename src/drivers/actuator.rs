//! Digital output channels for the enclosure actuators.
//!
//! Each [`OutputChannel`] wraps one `embedded-hal` output pin and keeps a
//! shadow of the level it last put on the pin.  `toggle` is resolved
//! against that shadow, so the controller always knows the physical level
//! even when it only ever asked for an inversion.
//!
//! Pin write failures are logged and otherwise ignored: actuator writes
//! are fire-and-forget from the control loop's point of view.

use embedded_hal::digital::{ErrorType, OutputPin, PinState, StatefulOutputPin};
use log::{debug, warn};

use crate::app::ports::{Actuator, ActuatorPort};

/// One GPIO output plus its level shadow.
pub struct OutputChannel<P> {
    name: &'static str,
    pin: P,
    level: PinState,
}

impl<P: StatefulOutputPin> OutputChannel<P> {
    /// Take ownership of `pin` and drive it low.
    pub fn new(name: &'static str, mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("{}: initial set_low failed", name);
        }
        Self {
            name,
            pin,
            level: PinState::Low,
        }
    }

    pub fn set(&mut self, level: PinState) {
        match self.pin.set_state(level) {
            Ok(()) => self.level = level,
            Err(_) => warn!("{}: write {:?} failed", self.name, level),
        }
    }

    pub fn toggle(&mut self) {
        let next = !self.level;
        match self.pin.toggle() {
            Ok(()) => {
                self.level = next;
                debug!("{}: toggled to {:?}", self.name, next);
            }
            Err(_) => warn!("{}: toggle failed", self.name),
        }
    }

    /// Physical level: read back from the pin latch when possible, else
    /// the shadow.  A disagreement re-syncs the shadow.
    pub fn level(&mut self) -> PinState {
        match self.pin.is_set_high() {
            Ok(high) => {
                let actual = PinState::from(high);
                if actual != self.level {
                    warn!("{}: shadow {:?} but pin reads {:?}", self.name, self.level, actual);
                    self.level = actual;
                }
                actual
            }
            Err(_) => self.level,
        }
    }
}

/// The four actuator outputs behind [`ActuatorPort`].
pub struct ActuatorBank<P> {
    lights: OutputChannel<P>,
    fan: OutputChannel<P>,
    cooling_left: OutputChannel<P>,
    cooling_right: OutputChannel<P>,
}

impl<P: StatefulOutputPin> ActuatorBank<P> {
    pub fn new(lights: P, fan: P, cooling_left: P, cooling_right: P) -> Self {
        Self {
            lights: OutputChannel::new(Actuator::Lights.name(), lights),
            fan: OutputChannel::new(Actuator::Fan.name(), fan),
            cooling_left: OutputChannel::new(Actuator::CoolingLeft.name(), cooling_left),
            cooling_right: OutputChannel::new(Actuator::CoolingRight.name(), cooling_right),
        }
    }

    fn channel(&mut self, actuator: Actuator) -> &mut OutputChannel<P> {
        match actuator {
            Actuator::Lights => &mut self.lights,
            Actuator::Fan => &mut self.fan,
            Actuator::CoolingLeft => &mut self.cooling_left,
            Actuator::CoolingRight => &mut self.cooling_right,
        }
    }
}

impl<P: StatefulOutputPin> ActuatorPort for ActuatorBank<P> {
    fn write_level(&mut self, actuator: Actuator, level: PinState) {
        self.channel(actuator).set(level);
    }

    fn toggle(&mut self, actuator: Actuator) {
        self.channel(actuator).toggle();
    }

    fn level(&mut self, actuator: Actuator) -> PinState {
        self.channel(actuator).level()
    }
}

// ── Host pin ──────────────────────────────────────────────────

/// Latch-only output pin for the host build and tests.
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
    /// When set every operation fails.
    pub broken: bool,
}

/// Error returned by a broken [`SimPin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl embedded_hal::digital::Error for SimPinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), SimPinError> {
        if self.broken {
            return Err(SimPinError);
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), SimPinError> {
        if self.broken {
            return Err(SimPinError);
        }
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, SimPinError> {
        if self.broken {
            return Err(SimPinError);
        }
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, SimPinError> {
        self.is_set_high().map(|h| !h)
    }
}
