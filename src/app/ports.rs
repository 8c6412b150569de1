//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (clock, sensors, actuators, link status, storage medium,
//! event sinks) implement these traits.  The
//! [`ControlLoop`](super::service::ControlLoop) consumes them via generics,
//! so the domain core never touches hardware or the filesystem directly.
//!
//! All collaborator calls are synchronous and assumed non-reentrant; the
//! loop is their only caller.

use embedded_hal::digital::PinState;

use crate::error::SensorError;
use crate::schedule::Timestamp;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source.  Has no failure mode visible to the core.
pub trait ClockPort {
    fn now(&mut self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Indoor climate from the combined temperature/pressure/humidity sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClimateReading {
    /// Centidegrees Celsius.
    pub temperature_centi: i32,
    /// Pascals.
    pub pressure_pa: u32,
    /// Relative humidity in hundredths of a percent.
    pub humidity_centi: u32,
}

/// Read-side port: one method per sensor, already compensated to
/// physical units by the driver behind it.
///
/// The loop calls them in declaration order every tick; each one
/// succeeds or fails on its own.
pub trait SensorPort {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError>;

    /// Oxygen concentration (ppm).
    fn read_oxygen(&mut self) -> Result<u32, SensorError>;

    /// Equivalent CO2 (ppm).
    fn read_air_quality(&mut self) -> Result<u16, SensorError>;

    /// Outdoor temperature (centidegrees Celsius).
    fn read_outdoor_temperature(&mut self) -> Result<i32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Every physical output the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    Lights,
    Fan,
    CoolingLeft,
    CoolingRight,
}

impl Actuator {
    pub const ALL: [Self; 4] = [Self::Lights, Self::Fan, Self::CoolingLeft, Self::CoolingRight];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Fan => "fan",
            Self::CoolingLeft => "cooling-left",
            Self::CoolingRight => "cooling-right",
        }
    }
}

/// Write-side port.  Writes are fire-and-forget: a failing pin is the
/// adapter's problem to log, not the loop's.
pub trait ActuatorPort {
    /// Drive the output to an explicit level.
    fn write_level(&mut self, actuator: Actuator, level: PinState);

    /// Invert the output.
    fn toggle(&mut self, actuator: Actuator);

    /// Level the output is physically at, as far as the adapter knows.
    fn level(&mut self, actuator: Actuator) -> PinState;
}

// ───────────────────────────────────────────────────────────────
// Link status port
// ───────────────────────────────────────────────────────────────

/// Network link status, reported in the telemetry log only.
pub trait LinkPort {
    /// Number of stations currently connected to the device.
    fn connected_stations(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → status stream)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, USB
/// logger, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ SD card / filesystem)
// ───────────────────────────────────────────────────────────────

/// How a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Read from the start; fails if the file is absent.
    Read,
    /// Create or truncate, then write.
    Create,
    /// Write at the end of an *existing* file; fails if the file is absent.
    Append,
}

/// Minimal file API of the storage medium.
///
/// Calls may block for as long as the medium takes; no timeout is applied
/// at this boundary.  An adapter that needs bounded latency must enforce it
/// itself and report [`StorageError::IoError`].
pub trait StoragePort {
    type Handle;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::Handle, StorageError>;

    /// Read up to `buf.len()` bytes.  `Ok(0)` means end of file.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write all of `data`.
    fn write(&mut self, handle: &mut Self::Handle, data: &[u8]) -> Result<(), StorageError>;

    fn flush(&mut self, handle: &mut Self::Handle) -> Result<(), StorageError>;

    fn close(&mut self, handle: Self::Handle) -> Result<(), StorageError>;

    /// Delete a file.
    fn remove(&mut self, path: &str) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested file does not exist.
    NotFound,
    /// Medium is not mounted or not responding.
    Unavailable,
    /// Medium is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::Unavailable => write!(f, "medium unavailable"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
