//! Time-of-day values and the schedule comparator.
//!
//! A [`TimeOfDay`] carries no calendar date; ordering is lexicographic on
//! (hour, minute) with no wrap-around.  Midnight-crossing windows are
//! handled one level up, in [`crate::control::lighting`], the same way
//! quiet-hour ranges are: by comparing the two bounds first.
//!
//! ```text
//!   00:00 ─────────────── on ═══════════ off ─────────── 23:59   same-day
//!   00:00 ═══════ off ─────────────────────── on ═══════ 23:59   overnight
//! ```

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════
//  TimeOfDay
// ═══════════════════════════════════════════════════════════════

/// Hour (0–23) and minute (0–59).  Construction range-checks both,
/// so every value in circulation is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct TimeOfDay {
    // Field order drives the derived `Ord`: hour first, then minute.
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Returns `None` if `hour > 23` or `minute > 59`.
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Constructor for literals.  In a `const` item an out-of-range value
    /// fails compilation instead of panicking at runtime.
    pub const fn at(hour: u8, minute: u8) -> Self {
        match Self::new(hour, minute) {
            Some(t) => t,
            None => panic!("time of day out of range"),
        }
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<(u8, u8)> for TimeOfDay {
    type Error = &'static str;

    fn try_from((hour, minute): (u8, u8)) -> Result<Self, Self::Error> {
        Self::new(hour, minute).ok_or("time of day out of range")
    }
}

impl From<TimeOfDay> for (u8, u8) {
    fn from(t: TimeOfDay) -> Self {
        (t.hour, t.minute)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Timestamp
// ═══════════════════════════════════════════════════════════════

/// Wall-clock snapshot as delivered by the clock collaborator.
///
/// The core only reads it; no field is validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    /// Hour and minute of this snapshot, in the same ordering as [`TimeOfDay`].
    ///
    /// Kept as a raw pair so an out-of-range clock value still compares
    /// deterministically instead of being rejected.
    pub const fn clock(&self) -> (u8, u8) {
        (self.hour, self.minute)
    }

    /// Hour and minute as a [`TimeOfDay`], clamped into range.
    pub const fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay {
            hour: if self.hour > 23 { 23 } else { self.hour },
            minute: if self.minute > 59 { 59 } else { self.minute },
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

// ═══════════════════════════════════════════════════════════════
//  Comparator
// ═══════════════════════════════════════════════════════════════

/// Compare two times of day.  `Less` means `a` is earlier in the day.
pub fn compare_time_of_day(a: TimeOfDay, b: TimeOfDay) -> Ordering {
    a.cmp(&b)
}

/// Compare a time of day against the hour/minute of a timestamp.
/// Seconds and the calendar date are ignored.
pub fn compare_to_timestamp(t: TimeOfDay, ts: &Timestamp) -> Ordering {
    (t.hour, t.minute).cmp(&ts.clock())
}
