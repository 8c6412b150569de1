//! Hardware adapter: bridges the peripherals to the domain port traits.
//!
//! Combines a sensor source, the actuator bank and the link status behind
//! [`SensorPort`], [`ActuatorPort`] and [`LinkPort`], so the control loop
//! takes a single `hw` argument.  On non-espidf targets the pieces are
//! the simulation stand-ins.

use embedded_hal::digital::PinState;

use crate::app::ports::{Actuator, ActuatorPort, ClimateReading, LinkPort, SensorPort};
use crate::error::SensorError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, A> {
    sensors: S,
    actuators: A,
    stations: u8,
}

impl<S, A> HardwareAdapter<S, A> {
    pub fn new(sensors: S, actuators: A) -> Self {
        Self {
            sensors,
            actuators,
            stations: 0,
        }
    }

    /// Record the number of connected stations reported by the network
    /// stack, if one is running.
    pub fn set_connected_stations(&mut self, stations: u8) {
        self.stations = stations;
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, A> SensorPort for HardwareAdapter<S, A> {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.sensors.read_climate()
    }

    fn read_oxygen(&mut self) -> Result<u32, SensorError> {
        self.sensors.read_oxygen()
    }

    fn read_air_quality(&mut self) -> Result<u16, SensorError> {
        self.sensors.read_air_quality()
    }

    fn read_outdoor_temperature(&mut self) -> Result<i32, SensorError> {
        self.sensors.read_outdoor_temperature()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<S, A: ActuatorPort> ActuatorPort for HardwareAdapter<S, A> {
    fn write_level(&mut self, actuator: Actuator, level: PinState) {
        self.actuators.write_level(actuator, level);
    }

    fn toggle(&mut self, actuator: Actuator) {
        self.actuators.toggle(actuator);
    }

    fn level(&mut self, actuator: Actuator) -> PinState {
        self.actuators.level(actuator)
    }
}

// ── LinkPort implementation ───────────────────────────────────

impl<S, A> LinkPort for HardwareAdapter<S, A> {
    fn connected_stations(&mut self) -> u8 {
        self.stations
    }
}
