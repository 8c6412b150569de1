//! Lighting schedule decision.
//!
//! The on-window is half-open, `[lights_on, lights_off)`.  When
//! `lights_on` is later in the day than `lights_off` the window wraps
//! past midnight and the lights are on everywhere *except*
//! `[lights_off, lights_on)`.

use core::cmp::Ordering;

use super::ActuatorState;
use crate::config::ScheduleConfig;
use crate::error::ConfigError;
use crate::schedule::{compare_time_of_day, compare_to_timestamp, Timestamp};

/// Desired lighting state at `now`.  Never returns `Toggle`.
///
/// Identical on and off times describe no window at all and are reported
/// as [`ConfigError::DegenerateSchedule`]; the caller keeps the lights
/// where they are.
pub fn lights_state(schedule: &ScheduleConfig, now: &Timestamp) -> Result<ActuatorState, ConfigError> {
    let ScheduleConfig { lights_on, lights_off } = *schedule;
    // on <= now  and  now < off
    let after_on = compare_to_timestamp(lights_on, now) != Ordering::Greater;
    let before_off = compare_to_timestamp(lights_off, now) == Ordering::Greater;

    let on = match compare_time_of_day(lights_on, lights_off) {
        Ordering::Less => after_on && before_off,
        // Off exactly inside [off, on).
        Ordering::Greater => after_on || before_off,
        Ordering::Equal => return Err(ConfigError::DegenerateSchedule(lights_on)),
    };
    Ok(if on { ActuatorState::On } else { ActuatorState::Off })
}
