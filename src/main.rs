//! Enclosure Controller Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        FsStorage      SystemClock  LogEventSink│
//! │  (Sensor+Actuator+Link) (StoragePort)  (ClockPort)  (EventSink) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  lighting schedule · thermal hysteresis · records      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Ticker (1 s delay-until)                                      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{error, info};

use enclosure::adapters::fs_storage::FsStorage;
use enclosure::adapters::hardware::HardwareAdapter;
use enclosure::adapters::log_sink::LogEventSink;
use enclosure::adapters::time::{SystemClock, Ticker};
use enclosure::app::service::ControlLoop;
use enclosure::config::{ControllerConfig, LoopSettings};
use enclosure::drivers::hw_init;
#[cfg(not(target_os = "espidf"))]
use enclosure::sensors::sim::SimulatedEnvironment;
#[cfg(target_os = "espidf")]
use enclosure::sensors::UnfittedSensors;

fn init_logging() -> Result<()> {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Ok(())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Enclosure controller v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let settings = LoopSettings::from_env();

    // ── 2. Hardware ───────────────────────────────────────────
    hw_init::mount_storage(&settings.storage_root).context("storage mount")?;
    let actuators = hw_init::init_actuators().context("actuator outputs")?;

    // TODO: swap UnfittedSensors for the BME280 / CCS811 / O2 drivers once
    // their I2C bindings land.
    #[cfg(target_os = "espidf")]
    let sensors = UnfittedSensors;
    #[cfg(not(target_os = "espidf"))]
    let sensors = SimulatedEnvironment::new();
    let mut hw = HardwareAdapter::new(sensors, actuators);

    let storage = FsStorage::new(&settings.storage_root);
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut ticker = Ticker::new(settings.tick_period);

    // ── 3. Startup: probe, bootstrap, load ────────────────────
    let mut control = ControlLoop::new(storage, ControllerConfig::default(), settings);
    if let Err(e) = control.start(&mut sink) {
        error!("Startup failed: {}, halting", e);
        return Err(e.into());
    }

    // ── 4. Control loop ───────────────────────────────────────
    loop {
        ticker.wait();
        control.tick(&mut clock, &mut hw, &mut sink);
    }
}
