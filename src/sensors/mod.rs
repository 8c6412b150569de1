//! Sensor subsystem: last-known-value retention, the host simulation and
//! the stand-in for boards with no sensor drivers.
//!
//! The [`SensorHub`] polls a [`SensorPort`] once per tick, in a fixed
//! order.  Each sensor succeeds or fails on its own; a failure is logged
//! and that sensor's previous good value is retained, so a single flaky
//! sensor never stops the control loop.

pub mod sim;

use log::warn;

use crate::app::ports::{ClimateReading, SensorPort};
use crate::error::SensorError;

/// Sensor identity, in polling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    Climate,
    Oxygen,
    AirQuality,
    Outdoor,
}

impl SensorId {
    pub const ALL: [Self; 4] = [Self::Climate, Self::Oxygen, Self::AirQuality, Self::Outdoor];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Climate => "climate",
            Self::Oxygen => "oxygen",
            Self::AirQuality => "air-quality",
            Self::Outdoor => "outdoor",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Latest good value of every sensor.  `None` until the first success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorReadings {
    pub climate: Option<ClimateReading>,
    pub oxygen_ppm: Option<u32>,
    pub eco2_ppm: Option<u16>,
    pub outdoor_temperature_centi: Option<i32>,
}

impl SensorReadings {
    /// Indoor temperature, if the climate sensor has ever answered.
    pub fn indoor_temperature_centi(&self) -> Option<i32> {
        self.climate.map(|c| c.temperature_centi)
    }
}

/// Sensor source for a board whose sensor drivers are not wired up.
/// Every read fails with [`SensorError::NotFitted`], so the hub keeps
/// `None` readings and the cooler is never switched on.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnfittedSensors;

impl SensorPort for UnfittedSensors {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        Err(SensorError::NotFitted)
    }

    fn read_oxygen(&mut self) -> Result<u32, SensorError> {
        Err(SensorError::NotFitted)
    }

    fn read_air_quality(&mut self) -> Result<u16, SensorError> {
        Err(SensorError::NotFitted)
    }

    fn read_outdoor_temperature(&mut self) -> Result<i32, SensorError> {
        Err(SensorError::NotFitted)
    }
}

/// Polls the sensors and keeps the last good reading of each.
#[derive(Debug, Default)]
pub struct SensorHub {
    readings: SensorReadings,
    failures: [u32; 4],
}

impl SensorHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll every sensor once.  Returns how many reads failed this time.
    pub fn refresh(&mut self, port: &mut impl SensorPort) -> usize {
        let mut failed = 0;

        if let Some(v) = self.check(SensorId::Climate, port.read_climate(), &mut failed) {
            self.readings.climate = Some(v);
        }
        if let Some(v) = self.check(SensorId::Oxygen, port.read_oxygen(), &mut failed) {
            self.readings.oxygen_ppm = Some(v);
        }
        if let Some(v) = self.check(SensorId::AirQuality, port.read_air_quality(), &mut failed) {
            self.readings.eco2_ppm = Some(v);
        }
        if let Some(v) = self.check(SensorId::Outdoor, port.read_outdoor_temperature(), &mut failed) {
            self.readings.outdoor_temperature_centi = Some(v);
        }
        failed
    }

    fn check<T>(&mut self, id: SensorId, result: Result<T, SensorError>, failed: &mut usize) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.failures[id.index()] = self.failures[id.index()].saturating_add(1);
                *failed += 1;
                warn!("{} sensor read failed: {} (keeping last value)", id.name(), e);
                None
            }
        }
    }

    pub fn readings(&self) -> &SensorReadings {
        &self.readings
    }

    /// Total failed reads of `id` since startup.
    pub fn failures(&self, id: SensorId) -> u32 {
        self.failures[id.index()]
    }
}
