//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Together they form the
//! controller's status stream; the shipped adapter renders them as log
//! lines.

use crate::config::ControllerConfig;
use crate::control::thermal::Transition;
use crate::control::ActuatorState;
use crate::error::ConfigError;
use crate::records::{ConfigSource, RecordError, RecordKind};
use crate::schedule::Timestamp;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Startup finished; the loop is about to run.
    Started,

    /// A log record could not be created; startup continued without it and
    /// appends will retry.
    BootstrapDegraded {
        kind: RecordKind,
        source: RecordError,
    },

    /// Configuration in force for this run.
    ConfigLoaded {
        config: ControllerConfig,
        source: ConfigSource,
    },

    /// The configuration record could not be used; defaults stay in force.
    ConfigLoadFailed(RecordError),

    /// Lights on and off are the same time; lights left as they were.
    ScheduleInvalid(ConfigError),

    /// Cooling decision for this tick.  `transition` is `Some` only on the
    /// tick the output changed.
    Cooling {
        transition: Option<Transition>,
        state: ActuatorState,
        goal_centi: i32,
        margin_centi: u32,
        measured_centi: Option<i32>,
    },

    /// Per-tick summary line.
    Status(StatusLine),

    /// A telemetry line was appended.
    TelemetryAppended(Timestamp),

    /// The telemetry append failed; it is retried at the next interval.
    TelemetryFailed(RecordError),
}

/// What the per-tick status line shows.  Actuator states are the physical
/// levels read back after driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub timestamp: Timestamp,
    pub lights: ActuatorState,
    pub fan: ActuatorState,
    pub cooling: ActuatorState,
    pub temperature_centi: Option<i32>,
}
