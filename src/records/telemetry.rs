//! Telemetry and warning log lines.
//!
//! Both logs share the same leading columns; a warning line adds a free
//! text message.  Values that do not fit saturate so a bad reading never
//! shifts the columns of the line.

use super::field::{
    CalendarDate, DateOrder, FieldKind, FieldSpec, FieldValue, Line, LineLayout, MAX_FIELDS,
    OverflowPolicy,
};
use super::RecordError;
use crate::app::ports::ClimateReading;
use crate::schedule::Timestamp;

/// Message carried by the placeholder line of a freshly created warning log.
pub const EXAMPLE_WARNING: &str =
    "Example Error message: this is NOT an error, just an example of the structure of errors";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("time", 0, 5, FieldKind::Clock),
    FieldSpec::new("date", 6, 10, FieldKind::Date(DateOrder::DayMonthYear)),
    FieldSpec::new("inside temp", 17, 5, FieldKind::SignedTenths),
    FieldSpec::new("inside press", 23, 6, FieldKind::Count),
    FieldSpec::new("inside humid", 30, 4, FieldKind::Tenths),
    FieldSpec::new("outside temp", 35, 5, FieldKind::SignedTenths),
    FieldSpec::new("o2", 41, 6, FieldKind::Count),
    FieldSpec::new("eco2", 48, 6, FieldKind::Count),
    FieldSpec::new("lights", 55, 3, FieldKind::Label),
    FieldSpec::new("fans", 59, 3, FieldKind::Label),
    FieldSpec::new("cooler", 63, 3, FieldKind::Label),
    FieldSpec::new("connection", 67, 3, FieldKind::Label),
];

const WARNING_FIELDS: &[FieldSpec] = &[
    FIELDS[0],
    FIELDS[1],
    FIELDS[2],
    FIELDS[3],
    FIELDS[4],
    FIELDS[5],
    FIELDS[6],
    FIELDS[7],
    FIELDS[8],
    FIELDS[9],
    FIELDS[10],
    FIELDS[11],
    FieldSpec::new("error", 71, EXAMPLE_WARNING.len(), FieldKind::Text),
];

pub const TELEMETRY_LAYOUT: LineLayout = LineLayout {
    fields: FIELDS,
    terminator: "\r\n",
    policy: OverflowPolicy::Saturate,
};

pub const WARNING_LAYOUT: LineLayout = LineLayout {
    fields: WARNING_FIELDS,
    terminator: "\r\n",
    policy: OverflowPolicy::Saturate,
};

/// One telemetry sample.  Temperatures and humidity are in hundredths
/// and are truncated to tenths on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelemetryRecord {
    pub timestamp: Timestamp,
    pub indoor: ClimateReading,
    pub outdoor_temperature_centi: i32,
    pub oxygen_ppm: u32,
    pub eco2_ppm: u16,
    pub lights_on: bool,
    pub fan_on: bool,
    pub cooling_on: bool,
    pub connected: bool,
}

const fn label(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

impl TelemetryRecord {
    fn values(&self) -> [FieldValue<'static>; 12] {
        let ts = &self.timestamp;
        [
            FieldValue::Clock(ts.time_of_day()),
            FieldValue::Date(CalendarDate {
                year: ts.year,
                month: ts.month,
                day: ts.day,
            }),
            FieldValue::SignedTenths(self.indoor.temperature_centi / 10),
            FieldValue::Count(self.indoor.pressure_pa),
            FieldValue::Tenths(self.indoor.humidity_centi / 10),
            FieldValue::SignedTenths(self.outdoor_temperature_centi / 10),
            FieldValue::Count(self.oxygen_ppm),
            FieldValue::Count(u32::from(self.eco2_ppm)),
            FieldValue::Label(label(self.lights_on)),
            FieldValue::Label(label(self.fan_on)),
            FieldValue::Label(label(self.cooling_on)),
            FieldValue::Label(label(self.connected)),
        ]
    }

    /// Telemetry log line, CRLF terminated.
    pub fn render(&self) -> Result<Line, RecordError> {
        TELEMETRY_LAYOUT.render(&self.values())
    }

    /// Warning log line carrying `message` (truncated to the column width).
    pub fn render_warning(&self, message: &str) -> Result<Line, RecordError> {
        let mut values: heapless::Vec<FieldValue<'_>, MAX_FIELDS> =
            heapless::Vec::from_slice(&self.values()).map_err(|()| RecordError::LineTooLong)?;
        values
            .push(FieldValue::Text(message))
            .map_err(|_| RecordError::LineTooLong)?;
        WARNING_LAYOUT.render(&values)
    }
}
