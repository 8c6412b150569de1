//! Persistent record store: configuration, telemetry and warning files.
//!
//! Every record kind owns one file made of a fixed header followed by
//! fixed-width lines.  Line encoding lives in [`field`]; the per-kind
//! column tables live in [`config_line`] and [`telemetry`]; file handling
//! (bootstrap, load, append with recovery) lives in [`store`].

pub mod config_line;
pub mod field;
pub mod store;
pub mod telemetry;

use core::fmt;

pub use field::{FieldKind, FieldSpec, FieldValue, Line, LineLayout, OverflowPolicy};
pub use store::{Bootstrap, ConfigLoad, ConfigSource, RecordStore};
pub use telemetry::TelemetryRecord;

use crate::app::ports::StorageError;
use crate::error::ConfigError;

/// Written and removed once at startup to prove the medium accepts writes.
pub const MARKER_PATH: &str = "check.txt";

const CONFIG_HEADER: &str = "check in time(hh:mm),check in date(mm/dd/yyyy),goal temp(°C),\
                             log Freq (min),light on time(hh:mm), light off time(hh:mm)\r\n";

const TELEMETRY_HEADER: &str = "Time(HH:MM),Date(dd/mm/yyyy),inside Temp(°C),inside press(Pa),\
                                inside humid(%),outside Temp(°C), O2(ppm),eCO2(ppm),lights,fans,cooler,connection\r\n";

const WARNING_HEADER: &str = "Errors and warnings will be listed below, including date and time of occurrence\r\n\
                              Time,Date(dd/mm/yyyy),inside Temp(°C),inside press(Pa),inside humid(%),outside Temp(°C),\
                              O2(ppm),eCO2(ppm),lights,fans,cooler,connection, error\r\n";

/// Static description of one record file.
#[derive(Debug)]
pub struct RecordFile {
    /// Path relative to the storage root.
    pub path: &'static str,
    pub header: &'static str,
    pub layout: LineLayout,
}

static CONFIGURATION: RecordFile = RecordFile {
    path: "system.txt",
    header: CONFIG_HEADER,
    layout: config_line::CONFIG_LAYOUT,
};

static TELEMETRY: RecordFile = RecordFile {
    path: "dataLog.csv",
    header: TELEMETRY_HEADER,
    layout: telemetry::TELEMETRY_LAYOUT,
};

static WARNING: RecordFile = RecordFile {
    path: "warnings.csv",
    header: WARNING_HEADER,
    layout: telemetry::WARNING_LAYOUT,
};

/// The three record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Configuration,
    Telemetry,
    Warning,
}

impl RecordKind {
    /// Bootstrap order.
    pub const ALL: [Self; 3] = [Self::Configuration, Self::Telemetry, Self::Warning];

    pub fn file(self) -> &'static RecordFile {
        match self {
            Self::Configuration => &CONFIGURATION,
            Self::Telemetry => &TELEMETRY,
            Self::Warning => &WARNING,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Telemetry => write!(f, "telemetry"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single column could not be encoded or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    /// Value does not fit the column width.
    Overflow,
    /// Unexpected character, separator or shape.
    Malformed,
    /// Well-formed but outside the value's range (e.g. minute 75).
    OutOfRange,
    /// Value variant does not match the column kind.
    KindMismatch,
    /// Column table offsets disagree with the rendered widths.
    Misaligned,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "value too wide"),
            Self::Malformed => write!(f, "malformed"),
            Self::OutOfRange => write!(f, "out of range"),
            Self::KindMismatch => write!(f, "wrong value kind"),
            Self::Misaligned => write!(f, "column table misaligned"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    Storage(StorageError),
    /// Nothing left to read where a header or line was expected.
    EndOfFile,
    /// Fewer (or more) bytes than the fixed header/line length.
    ReadLengthMismatch { expected: usize, actual: usize },
    Field {
        field: &'static str,
        problem: FieldProblem,
    },
    /// A line did not fit the line buffer.
    LineTooLong,
    /// Decoded configuration failed validation.
    Rejected(ConfigError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "{e}"),
            Self::EndOfFile => write!(f, "unexpected end of file"),
            Self::ReadLengthMismatch { expected, actual } => {
                write!(f, "read {actual} bytes, expected {expected}")
            }
            Self::Field { field, problem } => write!(f, "field '{field}': {problem}"),
            Self::LineTooLong => write!(f, "line exceeds buffer"),
            Self::Rejected(e) => write!(f, "{e}"),
        }
    }
}

impl From<StorageError> for RecordError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
