//! Simulated enclosure environment for host builds.
//!
//! Indoor temperature follows a slow triangle wave across the default
//! deadband so the cooling output cycles on and off; the other channels
//! hold plausible constants.  Any sensor can be made to fail.

use super::SensorId;
use crate::app::ports::{ClimateReading, SensorPort};
use crate::error::SensorError;

/// Lowest and highest simulated indoor temperature (centidegrees).
const TEMP_LOW: i32 = 1_850;
const TEMP_HIGH: i32 = 2_150;

#[derive(Debug, Default)]
pub struct SimulatedEnvironment {
    /// One step per climate read.
    steps: u32,
    failing: [bool; 4],
}

impl SimulatedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read of `sensor` fail (or succeed again).
    pub fn fail(&mut self, sensor: SensorId, failing: bool) {
        self.failing[sensor.index()] = failing;
    }

    /// Skip ahead `steps` climate reads.
    pub fn advance(&mut self, steps: u32) {
        self.steps = self.steps.wrapping_add(steps);
    }

    fn indoor_temperature(&self) -> i32 {
        let span = (TEMP_HIGH - TEMP_LOW) as u32;
        let phase = self.steps % (2 * span);
        let offset = if phase < span { phase } else { 2 * span - phase };
        TEMP_LOW + offset as i32
    }

    fn gate<T>(&self, sensor: SensorId, value: T) -> Result<T, SensorError> {
        if self.failing[sensor.index()] {
            Err(SensorError::BusError)
        } else {
            Ok(value)
        }
    }
}

impl SensorPort for SimulatedEnvironment {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        let reading = ClimateReading {
            temperature_centi: self.indoor_temperature(),
            pressure_pa: 101_325,
            humidity_centi: 4_500,
        };
        self.steps = self.steps.wrapping_add(1);
        self.gate(SensorId::Climate, reading)
    }

    fn read_oxygen(&mut self) -> Result<u32, SensorError> {
        self.gate(SensorId::Oxygen, 209_500)
    }

    fn read_air_quality(&mut self) -> Result<u16, SensorError> {
        self.gate(SensorId::AirQuality, 450)
    }

    fn read_outdoor_temperature(&mut self) -> Result<i32, SensorError> {
        self.gate(SensorId::Outdoor, 1_200)
    }
}
