//! Record store tests against a real directory via `FsStorage`.

use std::fs;
use std::time::Duration;

use enclosure::adapters::fs_storage::FsStorage;
use enclosure::adapters::hardware::HardwareAdapter;
use enclosure::app::ports::{StorageError, StoragePort};
use enclosure::app::service::{ControlLoop, TelemetryOutcome};
use enclosure::config::{ControllerConfig, LoopSettings};
use enclosure::drivers::actuator::{ActuatorBank, SimPin};
use enclosure::error::Error;
use enclosure::records::{Bootstrap, ConfigSource, RecordError, RecordKind, RecordStore, TelemetryRecord};
use enclosure::schedule::TimeOfDay;
use enclosure::sensors::sim::SimulatedEnvironment;

use crate::mock_hw::{ManualClock, RecordingSink};

fn fs_store(dir: &tempfile::TempDir) -> RecordStore<FsStorage> {
    RecordStore::new(FsStorage::new(dir.path()), ControllerConfig::default())
}

fn read(dir: &tempfile::TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

#[test]
fn bootstrap_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fs_store(&dir);

    for kind in RecordKind::ALL {
        assert_eq!(store.ensure_exists(kind), Ok(Bootstrap::Created));
    }
    let before: Vec<String> = RecordKind::ALL.iter().map(|k| read(&dir, k.file().path)).collect();

    for kind in RecordKind::ALL {
        assert_eq!(store.ensure_exists(kind), Ok(Bootstrap::Existing));
    }
    let after: Vec<String> = RecordKind::ALL.iter().map(|k| read(&dir, k.file().path)).collect();
    assert_eq!(before, after);
}

#[test]
fn created_files_carry_header_and_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    fs_store(&dir).ensure_all().unwrap();

    assert_eq!(
        read(&dir, "system.txt"),
        format!(
            "{}00:00,00/00/0000,20.0,001,08:20,20:20",
            RecordKind::Configuration.file().header
        )
    );
    let log = read(&dir, "dataLog.csv");
    assert!(log.ends_with("00:00,00/00/0000,+00.0,000000,00.0,+00.0,000000,000000,off,off,off,off\r\n"));

    let warnings = read(&dir, "warnings.csv");
    assert!(warnings.starts_with("Errors and warnings will be listed below"));
    assert!(warnings.ends_with("just an example of the structure of errors\r\n"));
}

#[test]
fn configuration_edited_on_disk_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fs_store(&dir);
    store.ensure_all().unwrap();

    let edited = format!(
        "{}07:45,11/02/2025,18.5,010,06:00,22:30",
        RecordKind::Configuration.file().header
    );
    fs::write(dir.path().join("system.txt"), edited).unwrap();

    let load = store.load_configuration().unwrap();
    assert_eq!(load.source, ConfigSource::Stored);
    assert_eq!(load.config.thermal.goal_centi, 1850);
    assert_eq!(load.config.log_interval_min, 10);
    assert_eq!(load.config.schedule.lights_on, TimeOfDay::at(6, 0));
    assert_eq!(load.config.schedule.lights_off, TimeOfDay::at(22, 30));
}

#[test]
fn out_of_range_clock_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fs_store(&dir);
    let edited = format!(
        "{}00:00,00/00/0000,20.0,001,25:00,20:20",
        RecordKind::Configuration.file().header
    );
    fs::write(dir.path().join("system.txt"), edited).unwrap();
    assert!(matches!(store.load_configuration(), Err(RecordError::Field { .. })));
}

#[test]
fn append_recovers_deleted_log_and_leaves_configuration_alone() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fs_store(&dir);
    store.ensure_all().unwrap();
    let config_before = read(&dir, "system.txt");

    fs::remove_file(dir.path().join("dataLog.csv")).unwrap();
    store.append_telemetry(&TelemetryRecord::default()).unwrap();

    assert_eq!(read(&dir, "dataLog.csv").matches("\r\n").count(), 3);
    assert_eq!(read(&dir, "system.txt"), config_before);
    assert_eq!(store.load_configuration().unwrap().config, ControllerConfig::default());
}

#[test]
fn appends_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = fs_store(&dir);
    store.ensure_all().unwrap();
    for _ in 0..4 {
        store.append_telemetry(&TelemetryRecord::default()).unwrap();
    }
    assert_eq!(read(&dir, "dataLog.csv").lines().count(), 6);
}

#[test]
fn missing_root_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FsStorage::new(dir.path().join("not-mounted"));
    assert_eq!(
        storage.open("system.txt", enclosure::app::ports::OpenMode::Read).unwrap_err(),
        StorageError::Unavailable
    );

    let settings = LoopSettings {
        probe_attempts: 2,
        probe_retry_delay: Duration::ZERO,
        ..LoopSettings::default()
    };
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings);
    assert_eq!(
        control.start(&mut RecordingSink::new()).unwrap_err(),
        Error::Storage(StorageError::Unavailable)
    );
}

#[test]
fn control_loop_runs_on_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let settings = LoopSettings {
        probe_retry_delay: Duration::ZERO,
        storage_root: dir.path().to_path_buf(),
        ..LoopSettings::default()
    };
    let storage = FsStorage::new(&settings.storage_root);
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings);
    let mut sink = RecordingSink::new();
    control.start(&mut sink).unwrap();
    assert!(!dir.path().join("check.txt").exists());

    let actuators = ActuatorBank::new(
        SimPin::default(),
        SimPin::default(),
        SimPin::default(),
        SimPin::default(),
    );
    let mut hw = HardwareAdapter::new(SimulatedEnvironment::new(), actuators);
    let mut clock = ManualClock::at(21, 5);

    let appended = (0..120)
        .filter(|_| control.tick(&mut clock, &mut hw, &mut sink).telemetry == TelemetryOutcome::Appended)
        .count();
    assert_eq!(appended, 2);

    let log = read(&dir, "dataLog.csv");
    let last = log.lines().last().unwrap();
    assert!(last.starts_with("21:05,09/03/2024,"), "{last}");
    // Lights are outside the 08:20-20:20 window.
    assert_eq!(&last[55..58], "off");
}
