//! The single data line of `system.txt`.
//!
//! ```text
//!   00:00,00/00/0000,20.0,001,08:20,20:20
//!   check-in  date   goal freq on    off
//! ```
//!
//! The goal is stored in tenths of a degree, so centidegree precision is
//! lost on write.  The deadband margin is not stored at all; decoding
//! takes it from the caller's defaults.

use super::field::{CalendarDate, DateOrder, FieldKind, FieldSpec, FieldValue, Line, LineLayout, OverflowPolicy};
use super::{FieldProblem, RecordError};
use crate::config::{ControllerConfig, ScheduleConfig, ThermalConfig};
use crate::schedule::TimeOfDay;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("check in time", 0, 5, FieldKind::Clock),
    FieldSpec::new("check in date", 6, 10, FieldKind::Date(DateOrder::MonthDayYear)),
    FieldSpec::new("goal temp", 17, 4, FieldKind::Tenths),
    FieldSpec::new("log freq", 22, 3, FieldKind::Count),
    FieldSpec::new("light on time", 26, 5, FieldKind::Clock),
    FieldSpec::new("light off time", 32, 5, FieldKind::Clock),
];

pub const CONFIG_LAYOUT: LineLayout = LineLayout {
    fields: FIELDS,
    terminator: "",
    policy: OverflowPolicy::Reject,
};

/// Encode `config`.  Check-in time and date are written as zeros.
pub fn encode(config: &ControllerConfig) -> Result<Line, RecordError> {
    let goal_tenths = u32::try_from(config.thermal.goal_centi / 10).map_err(|_| RecordError::Field {
        field: FIELDS[2].name,
        problem: FieldProblem::Overflow,
    })?;
    CONFIG_LAYOUT.render(&[
        FieldValue::Clock(TimeOfDay::MIDNIGHT),
        FieldValue::Date(CalendarDate::default()),
        FieldValue::Tenths(goal_tenths),
        FieldValue::Count(u32::from(config.log_interval_min)),
        FieldValue::Clock(config.schedule.lights_on),
        FieldValue::Clock(config.schedule.lights_off),
    ])
}

/// Decode a configuration line.  Fields the line does not carry come
/// from `defaults`.  The result is not validated.
pub fn decode(line: &str, defaults: &ControllerConfig) -> Result<ControllerConfig, RecordError> {
    let values = CONFIG_LAYOUT.parse(line)?;
    let [
        _,
        _,
        FieldValue::Tenths(goal_tenths),
        FieldValue::Count(interval),
        FieldValue::Clock(lights_on),
        FieldValue::Clock(lights_off),
    ] = values.as_slice()
    else {
        return Err(RecordError::Field {
            field: "configuration",
            problem: FieldProblem::KindMismatch,
        });
    };

    Ok(ControllerConfig {
        thermal: ThermalConfig {
            goal_centi: *goal_tenths as i32 * 10,
            margin_centi: defaults.thermal.margin_centi,
        },
        schedule: ScheduleConfig {
            lights_on: *lights_on,
            lights_off: *lights_off,
        },
        // Three digits always fit.
        log_interval_min: *interval as u16,
    })
}
