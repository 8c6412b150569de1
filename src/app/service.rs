//! Control loop: the hexagonal core.
//!
//! [`ControlLoop`] owns the configuration, the record store, the sensor
//! hub and both controllers.  All I/O flows through port traits injected
//! at call sites, making the whole loop testable with mock adapters.
//!
//! ```text
//!   ClockPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  SensorPort ──▶ │         ControlLoop          │
//! ActuatorPort ◀──│ lighting · thermal · records │ ◀─▶ StoragePort
//!    LinkPort ──▶ └──────────────────────────────┘
//! ```
//!
//! Startup has three phases (storage probe, record bootstrap, configuration
//! load).  Only the probe and the configuration record's bootstrap are
//! fatal.  After that [`ControlLoop::tick`] runs once per period and never
//! fails: every error becomes a log line or a status event.

use embedded_hal::digital::PinState;
use log::{debug, error, info, warn};

use crate::config::{ControllerConfig, LoopSettings};
use crate::control::lighting::lights_state;
use crate::control::thermal::ThermalController;
use crate::control::ActuatorState;
use crate::error::Error;
use crate::records::{ConfigSource, RecordError, RecordKind, RecordStore, TelemetryRecord};
use crate::sensors::SensorHub;

use super::events::{AppEvent, StatusLine};
use super::ports::{Actuator, ActuatorPort, ClockPort, EventSink, LinkPort, SensorPort, StoragePort};

/// Result of [`ControlLoop::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    /// Log record whose bootstrap failed; the remaining kinds were not
    /// attempted.
    pub degraded: Option<(RecordKind, RecordError)>,
    /// Where the running configuration came from, or why the stored one
    /// was not used.
    pub config: Result<ConfigSource, RecordError>,
}

/// What happened to telemetry on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryOutcome {
    NotDue,
    Appended,
    Failed(RecordError),
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Physical level of the lights after driving.
    pub lights: ActuatorState,
    /// Physical level of the cooling pair after driving.
    pub cooling: ActuatorState,
    pub telemetry: TelemetryOutcome,
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop<S: StoragePort> {
    store: RecordStore<S>,
    config: ControllerConfig,
    settings: LoopSettings,
    sensors: SensorHub,
    thermal: ThermalController,
    /// Last lighting decision; kept while the schedule is degenerate.
    lights: ActuatorState,
    /// Seconds since the last telemetry attempt.
    elapsed_secs: u32,
    tick_count: u64,
}

impl<S: StoragePort> ControlLoop<S> {
    /// `config` seeds a new configuration record and stays in force if the
    /// stored one cannot be loaded.
    ///
    /// Does **not** touch storage; call [`start`](Self::start) next.
    pub fn new(storage: S, config: ControllerConfig, settings: LoopSettings) -> Self {
        Self {
            store: RecordStore::new(storage, config),
            config,
            settings,
            sensors: SensorHub::new(),
            thermal: ThermalController::new(),
            lights: ActuatorState::Off,
            elapsed_secs: 0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Probe the medium, bootstrap every record file and load the
    /// configuration.  An `Err` means the loop must not run: the medium
    /// never became ready or the configuration record could not be
    /// created.  A log record that cannot be created is reported in the
    /// [`StartupReport`] and retried on append.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<StartupReport, Error> {
        self.store
            .probe_medium(self.settings.probe_attempts, self.settings.probe_retry_delay)
            .map_err(|e| {
                error!("Storage not ready after {} attempts: {}", self.settings.probe_attempts, e);
                Error::Storage(e)
            })?;

        let degraded = match self.store.ensure_all() {
            Ok(()) => None,
            Err((RecordKind::Configuration, source)) => {
                error!("Bootstrap of configuration record failed: {}", source);
                return Err(Error::Bootstrap {
                    kind: RecordKind::Configuration,
                    source,
                });
            }
            Err((kind, source)) => {
                warn!("Bootstrap of {} record failed: {}; continuing", kind, source);
                sink.emit(&AppEvent::BootstrapDegraded { kind, source });
                Some((kind, source))
            }
        };

        let config = match self.store.load_configuration() {
            Ok(load) => {
                self.config = load.config;
                sink.emit(&AppEvent::ConfigLoaded {
                    config: load.config,
                    source: load.source,
                });
                Ok(load.source)
            }
            Err(e) => {
                warn!("Configuration not loaded ({}); keeping defaults", e);
                sink.emit(&AppEvent::ConfigLoadFailed(e));
                Err(e)
            }
        };

        sink.emit(&AppEvent::Started);
        info!("ControlLoop started");
        Ok(StartupReport { degraded, config })
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: clock → sensors → controllers → actuators →
    /// status → telemetry.
    ///
    /// The `hw` parameter satisfies the sensor, actuator and link ports
    /// at once, avoiding a double mutable borrow while keeping the port
    /// boundary explicit.
    pub fn tick(
        &mut self,
        clock: &mut impl ClockPort,
        hw: &mut (impl SensorPort + ActuatorPort + LinkPort),
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;

        // 1. Clock
        let now = clock.now();

        // 2. Sensors (last good values retained on failure)
        let failed_reads = self.sensors.refresh(hw);
        let readings = *self.sensors.readings();

        // 3. Lighting schedule
        match lights_state(&self.config.schedule, &now) {
            Ok(state) => self.lights = state,
            Err(e) => {
                warn!("{}", e);
                sink.emit(&AppEvent::ScheduleInvalid(e));
            }
        }

        // 4. Thermal hysteresis
        let measured = readings.indoor_temperature_centi();
        let cooling = self.thermal.update(&self.config.thermal, measured);
        if let Some(t) = cooling.transition {
            info!("Cooling {:?} at {:?} centi-°C", t, measured);
        }
        sink.emit(&AppEvent::Cooling {
            transition: cooling.transition,
            state: cooling.state,
            goal_centi: self.config.thermal.goal_centi,
            margin_centi: self.config.thermal.margin_centi,
            measured_centi: measured,
        });

        // 5. Actuators, re-asserted every tick
        let lights = drive(hw, Actuator::Lights, self.lights);
        let fan = drive(hw, Actuator::Fan, ActuatorState::Off);
        let cooling_left = drive(hw, Actuator::CoolingLeft, cooling.state);
        let cooling_right = drive(hw, Actuator::CoolingRight, cooling.state);
        if cooling_left != cooling_right {
            warn!("Cooling outputs disagree: left {:?}, right {:?}", cooling_left, cooling_right);
        }

        // 6. Status line
        sink.emit(&AppEvent::Status(StatusLine {
            timestamp: now,
            lights: ActuatorState::from_level(lights),
            fan: ActuatorState::from_level(fan),
            cooling: ActuatorState::from_level(cooling_left),
            temperature_centi: measured,
        }));

        let record = TelemetryRecord {
            timestamp: now,
            indoor: readings.climate.unwrap_or_default(),
            outdoor_temperature_centi: readings.outdoor_temperature_centi.unwrap_or(0),
            oxygen_ppm: readings.oxygen_ppm.unwrap_or(0),
            eco2_ppm: readings.eco2_ppm.unwrap_or(0),
            lights_on: lights == PinState::High,
            fan_on: fan == PinState::High,
            cooling_on: cooling_left == PinState::High,
            connected: hw.connected_stations() > 0,
        };

        if failed_reads > 0 {
            if let Err(e) = self.store.append_warning(&record, "sensor read failed") {
                debug!("Warning append failed: {}", e);
            }
        }

        // 7. Telemetry, every `log_interval_min` minutes of ticks
        self.elapsed_secs = self.elapsed_secs.saturating_add(self.tick_secs());
        let telemetry = if self.elapsed_secs >= self.config.telemetry_period_secs() {
            // Reset whether or not the append works; a failure waits for
            // the next full interval.
            self.elapsed_secs = 0;
            match self.store.append_telemetry(&record) {
                Ok(()) => {
                    sink.emit(&AppEvent::TelemetryAppended(now));
                    TelemetryOutcome::Appended
                }
                Err(e) => {
                    warn!("Telemetry append failed: {}", e);
                    sink.emit(&AppEvent::TelemetryFailed(e));
                    TelemetryOutcome::Failed(e)
                }
            }
        } else {
            TelemetryOutcome::NotDue
        };

        TickReport {
            lights: ActuatorState::from_level(lights),
            cooling: ActuatorState::from_level(cooling_left),
            telemetry,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Configuration in force.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Seconds accumulated towards the next telemetry append.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sensors(&self) -> &SensorHub {
        &self.sensors
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore<S> {
        &mut self.store
    }

    // ── Internal ──────────────────────────────────────────────

    /// Whole seconds per tick; a sub-second period counts as one.
    fn tick_secs(&self) -> u32 {
        u32::try_from(self.settings.tick_period.as_secs())
            .unwrap_or(u32::MAX)
            .max(1)
    }
}

/// Apply `state` to one output and return its physical level afterwards.
fn drive(hw: &mut impl ActuatorPort, actuator: Actuator, state: ActuatorState) -> PinState {
    match state.level() {
        Some(level) => hw.write_level(actuator, level),
        None => hw.toggle(actuator),
    }
    hw.level(actuator)
}
