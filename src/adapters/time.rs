//! Clock and tick pacing.
//!
//! - [`SystemClock`] implements [`ClockPort`] from the local wall clock
//!   (`chrono`).  On the device this is the RTC-backed system time.
//! - [`Ticker`] paces the control loop with delay-until semantics: each
//!   deadline is the previous deadline plus one period, so time spent
//!   inside a tick does not accumulate as drift.

use std::time::{Duration, Instant};

use chrono::{Datelike, Local, Timelike};
use log::warn;

use crate::app::ports::ClockPort;
use crate::schedule::Timestamp;

/// Wall clock in local time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&mut self) -> Timestamp {
        let now = Local::now();
        Timestamp {
            year: u16::try_from(now.year()).unwrap_or(0),
            month: now.month() as u8,
            day: now.day() as u8,
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            second: now.second() as u8,
        }
    }
}

/// Fixed-period sleeper.
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// First deadline is one `period` from now.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Sleep until the next deadline.  If the loop has fallen more than a
    /// whole period behind, the schedule is re-anchored to now instead of
    /// firing a burst of catch-up ticks.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            std::thread::sleep(remaining);
            self.next += self.period;
        } else {
            let late = now - self.next;
            if late > self.period {
                warn!("tick overran by {} ms; re-anchoring", late.as_millis());
                self.next = now + self.period;
            } else {
                self.next += self.period;
            }
        }
    }
}
