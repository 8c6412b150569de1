//! Unified error types for the enclosure controller.
//!
//! Every variant is `Copy` so errors can be carried inside
//! [`AppEvent`](crate::app::events::AppEvent)s and compared in tests
//! without allocation.  Only startup can fail outright; once the control
//! loop is running every error is converted to a status line at the call
//! site that produced it.

use core::fmt;

use crate::app::ports::StorageError;
use crate::records::{RecordError, RecordKind};
use crate::schedule::TimeOfDay;

// ---------------------------------------------------------------------------
// Startup error
// ---------------------------------------------------------------------------

/// Fatal startup failures.  The control loop never starts after one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The storage medium never accepted the readiness marker.
    Storage(StorageError),
    /// The configuration record could not be created on first use.
    Bootstrap {
        kind: RecordKind,
        source: RecordError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage unavailable: {e}"),
            Self::Bootstrap { kind, source } => {
                write!(f, "bootstrap of {} failed: {source}", kind.file().path)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C / ADC transaction failed or timed out.
    BusError,
    /// Sensor is still warming up or calibrating.
    NotReady,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// No driver is attached for this sensor.
    NotFitted,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusError => write!(f, "bus transaction failed"),
            Self::NotReady => write!(f, "sensor not ready"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NotFitted => write!(f, "sensor not fitted"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Lights-on and lights-off are the same time of day.
    DegenerateSchedule(TimeOfDay),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateSchedule(t) => {
                write!(f, "lights on and off are both {t}; schedule undefined")
            }
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}
