//! Mock adapters for integration tests.
//!
//! `MockHardware` records every actuator call and serves scripted sensor
//! readings; `ManualClock` is set by the test; `RecordingSink` keeps every
//! emitted event.

use embedded_hal::digital::PinState;
use enclosure::app::events::AppEvent;
use enclosure::app::ports::{
    Actuator, ActuatorPort, ClimateReading, ClockPort, EventSink, LinkPort, SensorPort,
};
use enclosure::error::SensorError;
use enclosure::schedule::Timestamp;
use std::collections::HashMap;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Write(Actuator, PinState),
    Toggle(Actuator),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    levels: HashMap<Actuator, PinState>,
    /// Indoor temperature served by `read_climate`; `Err` makes it fail.
    pub temperature: Result<i32, SensorError>,
    pub oxygen: Result<u32, SensorError>,
    pub stations: u8,
    pub climate_reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            levels: HashMap::new(),
            temperature: Ok(2000),
            oxygen: Ok(209_000),
            stations: 0,
            climate_reads: 0,
        }
    }

    pub fn is_high(&self, actuator: Actuator) -> bool {
        self.levels.get(&actuator) == Some(&PinState::High)
    }

    /// Write calls made to `actuator`, in order.
    pub fn writes(&self, actuator: Actuator) -> Vec<PinState> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Write(a, level) if *a == actuator => Some(*level),
                _ => None,
            })
            .collect()
    }
}

impl SensorPort for MockHardware {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.climate_reads += 1;
        self.temperature.map(|t| ClimateReading {
            temperature_centi: t,
            pressure_pa: 101_300,
            humidity_centi: 5_000,
        })
    }

    fn read_oxygen(&mut self) -> Result<u32, SensorError> {
        self.oxygen
    }

    fn read_air_quality(&mut self) -> Result<u16, SensorError> {
        Ok(400)
    }

    fn read_outdoor_temperature(&mut self) -> Result<i32, SensorError> {
        Ok(1_500)
    }
}

impl ActuatorPort for MockHardware {
    fn write_level(&mut self, actuator: Actuator, level: PinState) {
        self.calls.push(ActuatorCall::Write(actuator, level));
        self.levels.insert(actuator, level);
    }

    fn toggle(&mut self, actuator: Actuator) {
        self.calls.push(ActuatorCall::Toggle(actuator));
        let next = !self.levels.get(&actuator).copied().unwrap_or(PinState::Low);
        self.levels.insert(actuator, next);
    }

    fn level(&mut self, actuator: Actuator) -> PinState {
        self.levels.get(&actuator).copied().unwrap_or(PinState::Low)
    }
}

impl LinkPort for MockHardware {
    fn connected_stations(&mut self) -> u8 {
        self.stations
    }
}

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock {
    pub now: Timestamp,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            now: Timestamp {
                year: 2024,
                month: 3,
                day: 9,
                hour,
                minute,
                second: 0,
            },
        }
    }

    pub fn set(&mut self, hour: u8, minute: u8) {
        self.now.hour = hour;
        self.now.minute = minute;
    }
}

impl ClockPort for ManualClock {
    fn now(&mut self) -> Timestamp {
        self.now
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
