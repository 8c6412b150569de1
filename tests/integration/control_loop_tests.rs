//! Integration tests for `ControlLoop` startup and per-tick behaviour,
//! using mock hardware, a manual clock and the in-memory medium.

use std::time::Duration;

use crate::mock_hw::{ManualClock, MockHardware, RecordingSink};
use embedded_hal::digital::PinState;
use enclosure::app::events::AppEvent;
use enclosure::app::ports::{Actuator, OpenMode, StorageError, StoragePort};
use enclosure::app::service::{ControlLoop, TelemetryOutcome};
use enclosure::adapters::hardware::HardwareAdapter;
use enclosure::adapters::mem_storage::MemStorage;
use enclosure::config::{ControllerConfig, LoopSettings};
use enclosure::control::ActuatorState;
use enclosure::drivers::actuator::{ActuatorBank, SimPin};
use enclosure::error::{ConfigError, Error, SensorError};
use enclosure::records::{ConfigSource, RecordError, RecordKind};
use enclosure::schedule::TimeOfDay;
use enclosure::sensors::{SensorId, UnfittedSensors};

// ── Helpers ───────────────────────────────────────────────────

fn settings() -> LoopSettings {
    LoopSettings {
        probe_retry_delay: Duration::ZERO,
        ..LoopSettings::default()
    }
}

fn config_file(line: &str) -> Vec<u8> {
    let mut content = RecordKind::Configuration.file().header.as_bytes().to_vec();
    content.extend_from_slice(line.as_bytes());
    content
}

fn started_with(storage: MemStorage) -> (ControlLoop<MemStorage>, RecordingSink) {
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());
    let mut sink = RecordingSink::new();
    control.start(&mut sink).unwrap();
    (control, sink)
}

fn started() -> (ControlLoop<MemStorage>, RecordingSink) {
    started_with(MemStorage::new())
}

fn line_count(control: &ControlLoop<MemStorage>, path: &str) -> usize {
    let bytes = control.store().storage().file(path).unwrap();
    String::from_utf8_lossy(bytes).matches("\r\n").count()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_bootstraps_every_record() {
    let (control, sink) = started();
    let storage = control.store().storage();
    for kind in RecordKind::ALL {
        assert!(storage.file(kind.file().path).is_some(), "{kind} missing");
    }
    assert_eq!(*control.config(), ControllerConfig::default());
    assert!(!sink.events.iter().any(|e| matches!(e, AppEvent::BootstrapDegraded { .. })));
    assert!(sink.events.contains(&AppEvent::Started));
}

#[test]
fn bootstrapped_configuration_reloads_to_defaults() {
    let (mut control, _) = started();
    let load = control.store_mut().load_configuration().unwrap();
    assert_eq!(load.source, ConfigSource::Stored);
    assert_eq!(load.config, ControllerConfig::default());
}

#[test]
fn startup_loads_stored_configuration() {
    let mut storage = MemStorage::new();
    storage.insert("system.txt", &config_file("09:15,02/14/2024,23.0,005,20:00,08:00"));
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());
    let mut sink = RecordingSink::new();

    let report = control.start(&mut sink).unwrap();
    assert_eq!(report.config, Ok(ConfigSource::Stored));

    let c = control.config();
    assert_eq!(c.thermal.goal_centi, 2300);
    assert_eq!(c.thermal.margin_centi, 100);
    assert_eq!(c.log_interval_min, 5);
    assert_eq!(c.schedule.lights_on, TimeOfDay::at(20, 0));
    assert_eq!(c.schedule.lights_off, TimeOfDay::at(8, 0));
}

#[test]
fn unreadable_configuration_keeps_defaults() {
    let mut storage = MemStorage::new();
    // Header only: the data line is missing.
    storage.insert("system.txt", &config_file(""));
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());
    let mut sink = RecordingSink::new();

    let report = control.start(&mut sink).unwrap();
    assert_eq!(report.config, Err(RecordError::EndOfFile));
    assert_eq!(*control.config(), ControllerConfig::default());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ConfigLoadFailed(RecordError::EndOfFile))),
        1
    );
}

#[test]
fn truncated_configuration_is_a_length_mismatch() {
    let mut storage = MemStorage::new();
    storage.insert("system.txt", &config_file("09:15,02/14"));
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());
    let report = control.start(&mut RecordingSink::new()).unwrap();
    assert_eq!(
        report.config,
        Err(RecordError::ReadLengthMismatch {
            expected: 37,
            actual: 11
        })
    );
}

#[test]
fn unavailable_storage_is_fatal() {
    let mut storage = MemStorage::new();
    storage.set_unavailable(true);
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());

    let err = control.start(&mut RecordingSink::new()).unwrap_err();
    assert_eq!(err, Error::Storage(StorageError::Unavailable));
    assert_eq!(control.store().storage().open_calls(), 4);
}

#[test]
fn configuration_bootstrap_failure_is_fatal() {
    let mut storage = MemStorage::new();
    storage.fail_path("system.txt");
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());

    let err = control.start(&mut RecordingSink::new()).unwrap_err();
    assert_eq!(
        err,
        Error::Bootstrap {
            kind: RecordKind::Configuration,
            source: RecordError::Storage(StorageError::IoError),
        }
    );
    assert!(control.store().storage().file("dataLog.csv").is_none());
}

#[test]
fn transient_read_failure_at_startup_keeps_configuration_file() {
    let stored = config_file("07:45,11/02/2025,18.5,010,06:00,22:30");
    let mut storage = MemStorage::new();
    storage.insert("system.txt", &stored);
    storage.fail_next_open("system.txt", OpenMode::Read);
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());

    let err = control.start(&mut RecordingSink::new()).unwrap_err();
    assert_eq!(
        err,
        Error::Bootstrap {
            kind: RecordKind::Configuration,
            source: RecordError::Storage(StorageError::IoError),
        }
    );
    assert_eq!(control.store().storage().file("system.txt"), Some(&stored[..]));

    // The next start reads the untouched file.
    let report = control.start(&mut RecordingSink::new()).unwrap();
    assert_eq!(report.config, Ok(ConfigSource::Stored));
    assert_eq!(control.config().thermal.goal_centi, 1850);
}

#[test]
fn log_bootstrap_failure_degrades_startup() {
    let mut storage = MemStorage::new();
    storage.fail_path("dataLog.csv");
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings());
    let mut sink = RecordingSink::new();

    let report = control.start(&mut sink).unwrap();
    let failure = (RecordKind::Telemetry, RecordError::Storage(StorageError::IoError));
    assert_eq!(report.degraded, Some(failure));
    assert_eq!(report.config, Ok(ConfigSource::Stored));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::BootstrapDegraded { kind: RecordKind::Telemetry, .. })),
        1
    );
    // Bootstrap stops at the first failure.
    assert!(control.store().storage().file("system.txt").is_some());
    assert!(control.store().storage().file("warnings.csv").is_none());

    // The loop runs; once the log can be created the next append succeeds.
    control.store_mut().storage_mut().clear_faults();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);
    let last = (0..60)
        .map(|_| control.tick(&mut clock, &mut hw, &mut sink).telemetry)
        .last();
    assert_eq!(last, Some(TelemetryOutcome::Appended));
    assert_eq!(line_count(&control, "dataLog.csv"), 3);
}

// ── Lighting ──────────────────────────────────────────────────

#[test]
fn same_day_window_drives_lights() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(8, 19);

    for (h, m, expected) in [
        (8, 19, ActuatorState::Off),
        (8, 20, ActuatorState::On),
        (20, 19, ActuatorState::On),
        (20, 20, ActuatorState::Off),
    ] {
        clock.set(h, m);
        let report = control.tick(&mut clock, &mut hw, &mut sink);
        assert_eq!(report.lights, expected, "{h:02}:{m:02}");
    }
    assert_eq!(
        hw.writes(Actuator::Lights),
        vec![PinState::Low, PinState::High, PinState::High, PinState::Low]
    );
}

#[test]
fn overnight_window_drives_lights() {
    let mut storage = MemStorage::new();
    storage.insert("system.txt", &config_file("00:00,00/00/0000,20.0,001,20:00,08:00"));
    let (mut control, mut sink) = started_with(storage);
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(0, 0);

    for (h, expected) in [
        (23, ActuatorState::On),
        (3, ActuatorState::On),
        (8, ActuatorState::Off),
        (12, ActuatorState::Off),
        (20, ActuatorState::On),
    ] {
        clock.set(h, 0);
        assert_eq!(control.tick(&mut clock, &mut hw, &mut sink).lights, expected, "{h}:00");
    }
}

#[test]
fn degenerate_schedule_is_reported_and_lights_hold() {
    let mut storage = MemStorage::new();
    storage.insert("system.txt", &config_file("00:00,00/00/0000,20.0,001,07:30,07:30"));
    let (mut control, mut sink) = started_with(storage);
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    for _ in 0..3 {
        assert_eq!(control.tick(&mut clock, &mut hw, &mut sink).lights, ActuatorState::Off);
    }
    let expected = AppEvent::ScheduleInvalid(ConfigError::DegenerateSchedule(TimeOfDay::at(7, 30)));
    assert_eq!(sink.count(|e| *e == expected), 3);
}

// ── Thermal ───────────────────────────────────────────────────

#[test]
fn hysteresis_drives_both_coolers() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    hw.temperature = Ok(2101);
    assert_eq!(control.tick(&mut clock, &mut hw, &mut sink).cooling, ActuatorState::On);
    assert!(hw.is_high(Actuator::CoolingLeft));
    assert!(hw.is_high(Actuator::CoolingRight));

    hw.temperature = Ok(2000);
    assert_eq!(control.tick(&mut clock, &mut hw, &mut sink).cooling, ActuatorState::On);

    hw.temperature = Ok(1899);
    assert_eq!(control.tick(&mut clock, &mut hw, &mut sink).cooling, ActuatorState::Off);
    assert!(!hw.is_high(Actuator::CoolingLeft));
    assert!(!hw.is_high(Actuator::CoolingRight));

    hw.temperature = Ok(2000);
    assert_eq!(control.tick(&mut clock, &mut hw, &mut sink).cooling, ActuatorState::Off);
}

#[test]
fn cooling_transitions_are_reported_once() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    hw.temperature = Ok(2200);
    for _ in 0..5 {
        control.tick(&mut clock, &mut hw, &mut sink);
    }
    let edges = sink.count(|e| matches!(e, AppEvent::Cooling { transition: Some(_), .. }));
    let steady = sink.count(|e| matches!(e, AppEvent::Cooling { transition: None, .. }));
    assert_eq!(edges, 1);
    assert_eq!(steady, 4);
}

#[test]
fn board_without_sensors_keeps_cooling_off() {
    let (mut control, mut sink) = started();
    let actuators = ActuatorBank::new(
        SimPin::default(),
        SimPin::default(),
        SimPin::default(),
        SimPin::default(),
    );
    let mut hw = HardwareAdapter::new(UnfittedSensors, actuators);
    let mut clock = ManualClock::at(12, 0);

    for _ in 0..3 {
        let report = control.tick(&mut clock, &mut hw, &mut sink);
        assert_eq!(report.cooling, ActuatorState::Off);
        assert_eq!(report.lights, ActuatorState::On);
    }
    assert_eq!(control.sensors().readings().indoor_temperature_centi(), None);
    for id in SensorId::ALL {
        assert_eq!(control.sensors().failures(id), 3);
    }
}

#[test]
fn failed_sensor_keeps_last_temperature() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    hw.temperature = Ok(2150);
    control.tick(&mut clock, &mut hw, &mut sink);

    hw.temperature = Err(SensorError::BusError);
    hw.oxygen = Err(SensorError::NotReady);
    sink.clear();
    let report = control.tick(&mut clock, &mut hw, &mut sink);

    assert_eq!(report.cooling, ActuatorState::On);
    assert_eq!(control.sensors().readings().indoor_temperature_centi(), Some(2150));
    assert_eq!(control.sensors().readings().oxygen_ppm, Some(209_000));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Status(s) if s.temperature_centi == Some(2150)
    )));
}

#[test]
fn no_reading_yet_leaves_cooling_off() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    hw.temperature = Err(SensorError::NotFitted);
    let report = control.tick(&mut ManualClock::at(12, 0), &mut hw, &mut sink);
    assert_eq!(report.cooling, ActuatorState::Off);
    assert_eq!(hw.climate_reads, 1);
}

#[test]
fn fan_is_held_off() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);
    for _ in 0..3 {
        control.tick(&mut clock, &mut hw, &mut sink);
    }
    assert_eq!(hw.writes(Actuator::Fan), vec![PinState::Low; 3]);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_once_per_sixty_ticks() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    let mut appended = Vec::new();
    for tick in 1..=180 {
        let report = control.tick(&mut clock, &mut hw, &mut sink);
        if report.telemetry == TelemetryOutcome::Appended {
            appended.push(tick);
        }
        if tick == 59 {
            assert_eq!(control.elapsed_secs(), 59);
        }
    }
    assert_eq!(appended, vec![60, 120, 180]);
    assert_eq!(control.elapsed_secs(), 0);
    // Header, placeholder, three records.
    assert_eq!(line_count(&control, "dataLog.csv"), 5);
}

#[test]
fn failed_telemetry_still_resets_counter() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    control.store_mut().storage_mut().fail_path("dataLog.csv");
    for _ in 0..59 {
        assert_eq!(
            control.tick(&mut clock, &mut hw, &mut sink).telemetry,
            TelemetryOutcome::NotDue
        );
    }
    assert!(matches!(
        control.tick(&mut clock, &mut hw, &mut sink).telemetry,
        TelemetryOutcome::Failed(RecordError::Storage(StorageError::IoError))
    ));
    assert_eq!(control.elapsed_secs(), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::TelemetryFailed(_))), 1);

    control.store_mut().storage_mut().clear_faults();
    let outcomes: Vec<_> = (0..60)
        .map(|_| control.tick(&mut clock, &mut hw, &mut sink).telemetry)
        .collect();
    assert_eq!(outcomes[..59], [TelemetryOutcome::NotDue; 59]);
    assert_eq!(outcomes[59], TelemetryOutcome::Appended);
}

#[test]
fn deleted_log_is_recreated_on_next_append() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    control.store_mut().storage_mut().remove("dataLog.csv").unwrap();
    let outcome = (0..60)
        .map(|_| control.tick(&mut clock, &mut hw, &mut sink).telemetry)
        .last();
    assert_eq!(outcome, Some(TelemetryOutcome::Appended));
    assert_eq!(line_count(&control, "dataLog.csv"), 3);

    let reload = control.store_mut().load_configuration().unwrap();
    assert_eq!(reload.source, ConfigSource::Stored);
    assert_eq!(reload.config, ControllerConfig::default());
}

#[test]
fn telemetry_line_reflects_physical_outputs() {
    let (mut control, mut sink) = started();
    let mut hw = MockHardware::new();
    hw.temperature = Ok(2234);
    hw.stations = 2;
    let mut clock = ManualClock::at(12, 34);

    for _ in 0..60 {
        control.tick(&mut clock, &mut hw, &mut sink);
    }
    let text = String::from_utf8_lossy(control.store().storage().file("dataLog.csv").unwrap()).into_owned();
    let last = text.trim_end().lines().last().unwrap();
    assert_eq!(
        last,
        "12:34,09/03/2024,+22.3,101300,50.0,+15.0,209000,000400, on,off, on, on"
    );
}

#[test]
fn longer_interval_waits_longer() {
    let mut storage = MemStorage::new();
    storage.insert("system.txt", &config_file("00:00,00/00/0000,20.0,002,08:20,20:20"));
    let (mut control, mut sink) = started_with(storage);
    let mut hw = MockHardware::new();
    let mut clock = ManualClock::at(12, 0);

    let appended = (1..=240)
        .filter(|_| control.tick(&mut clock, &mut hw, &mut sink).telemetry == TelemetryOutcome::Appended)
        .count();
    assert_eq!(appended, 2);
}
