//! Fixed-width field tables shared by the record writer and parser.
//!
//! A [`LineLayout`] lists every column of a record line as
//! `(name, offset, width, kind)`.  [`LineLayout::render`] and
//! [`LineLayout::parse`] both walk the same table, so a width change is
//! always applied to both directions at once.
//!
//! ```text
//!   offset 0     6          17   22  26    32
//!          hh:mm,mm/dd/yyyy,DD.D,NNN,hh:mm,hh:mm
//!          └────┘└─────────┘└───┘└──┘└────┘└────┘
//! ```
//!
//! Columns are separated by exactly one `,`.  Parsing checks length,
//! separators and every character of a field before converting it.

use core::fmt::Write as _;

use heapless::{String, Vec};

use super::{FieldProblem, RecordError};
use crate::schedule::TimeOfDay;

/// Longest line or header any layout may produce.
pub const LINE_CAP: usize = 256;

/// Upper bound on columns per layout.
pub const MAX_FIELDS: usize = 16;

/// Rendered record line.
pub type Line = String<LINE_CAP>;

/// Field order of a calendar date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// `mm/dd/yyyy`
    MonthDayYear,
    /// `dd/mm/yyyy`
    DayMonthYear,
}

/// Encoding of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `hh:mm`, width 5.
    Clock,
    /// Two-digit day and month, four-digit year, width 10.
    Date(DateOrder),
    /// Unsigned decimal with one fractional digit, zero padded (`07.5`).
    Tenths,
    /// Sign, then as [`FieldKind::Tenths`] (`+21.4`, `-03.0`).
    SignedTenths,
    /// Unsigned integer, zero padded.
    Count,
    /// Lowercase word, right aligned (`off`, ` on`).
    Label,
    /// Printable ASCII, left aligned and space padded.
    Text,
}

/// What to do with a value that does not fit its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Fail the whole line.
    Reject,
    /// Clamp numbers to the widest representable value, truncate text.
    Saturate,
}

/// Calendar date as stored in a record.  Not range checked: placeholder
/// lines carry `00/00/0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A decoded or to-be-encoded column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Clock(TimeOfDay),
    Date(CalendarDate),
    /// Value in tenths.
    Tenths(u32),
    /// Value in tenths.
    SignedTenths(i32),
    Count(u32),
    Label(&'a str),
    Text(&'a str),
}

/// One column of a [`LineLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, offset: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset,
            width,
            kind,
        }
    }

    const fn end(&self) -> usize {
        self.offset + self.width
    }

    fn error(&self, problem: FieldProblem) -> RecordError {
        RecordError::Field {
            field: self.name,
            problem,
        }
    }
}

/// Column table for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub fields: &'static [FieldSpec],
    /// Appended after the last column (`""` or `"\r\n"`).
    pub terminator: &'static str,
    pub policy: OverflowPolicy,
}

impl LineLayout {
    /// Exact byte length of a line, terminator included.
    pub fn len(&self) -> usize {
        self.fields.last().map_or(0, FieldSpec::end) + self.terminator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode `values` (one per column, in table order).
    pub fn render(&self, values: &[FieldValue<'_>]) -> Result<Line, RecordError> {
        debug_assert_eq!(values.len(), self.fields.len(), "one value per column");

        let mut line = Line::new();
        for (i, (spec, value)) in self.fields.iter().zip(values).enumerate() {
            if i > 0 {
                line.push(',').map_err(|()| RecordError::LineTooLong)?;
            }
            if line.len() != spec.offset {
                return Err(spec.error(FieldProblem::Misaligned));
            }
            self.render_field(&mut line, spec, value)?;
            if line.len() != spec.end() {
                return Err(spec.error(FieldProblem::Misaligned));
            }
        }
        line.push_str(self.terminator)
            .map_err(|()| RecordError::LineTooLong)?;
        Ok(line)
    }

    /// Decode a complete line (terminator included).
    pub fn parse<'a>(&self, line: &'a str) -> Result<Vec<FieldValue<'a>, MAX_FIELDS>, RecordError> {
        if line.len() != self.len() {
            return Err(RecordError::ReadLengthMismatch {
                expected: self.len(),
                actual: line.len(),
            });
        }
        let bytes = line.as_bytes();
        let body_len = line.len() - self.terminator.len();
        if &bytes[body_len..] != self.terminator.as_bytes() {
            return Err(RecordError::Field {
                field: "terminator",
                problem: FieldProblem::Malformed,
            });
        }

        let mut out = Vec::new();
        for (i, spec) in self.fields.iter().enumerate() {
            if i > 0 && bytes.get(spec.offset.wrapping_sub(1)) != Some(&b',') {
                return Err(spec.error(FieldProblem::Malformed));
            }
            let raw = line
                .get(spec.offset..spec.end())
                .ok_or(spec.error(FieldProblem::Misaligned))?;
            let value = decode(spec, raw)?;
            out.push(value)
                .map_err(|_| spec.error(FieldProblem::Misaligned))?;
        }
        Ok(out)
    }

    fn render_field(
        &self,
        line: &mut Line,
        spec: &FieldSpec,
        value: &FieldValue<'_>,
    ) -> Result<(), RecordError> {
        let w = spec.width;
        let overflow = |fits: bool| -> Result<bool, RecordError> {
            match (fits, self.policy) {
                (true, _) => Ok(false),
                (false, OverflowPolicy::Saturate) => Ok(true),
                (false, OverflowPolicy::Reject) => Err(spec.error(FieldProblem::Overflow)),
            }
        };
        let written = match (spec.kind, *value) {
            (FieldKind::Clock, FieldValue::Clock(t)) => {
                write!(line, "{:02}:{:02}", t.hour(), t.minute())
            }
            (FieldKind::Date(order), FieldValue::Date(d)) => {
                let year = if overflow(d.year <= 9999)? { 9999 } else { d.year };
                let month = if overflow(d.month <= 99)? { 99 } else { d.month };
                let day = if overflow(d.day <= 99)? { 99 } else { d.day };
                match order {
                    DateOrder::MonthDayYear => write!(line, "{month:02}/{day:02}/{year:04}"),
                    DateOrder::DayMonthYear => write!(line, "{day:02}/{month:02}/{year:04}"),
                }
            }
            (FieldKind::Tenths, FieldValue::Tenths(v)) => {
                let max = max_digits_value(w.saturating_sub(1));
                let v = if overflow(v <= max)? { max } else { v };
                write!(line, "{:0iw$}.{}", v / 10, v % 10, iw = w.saturating_sub(2))
            }
            (FieldKind::SignedTenths, FieldValue::SignedTenths(v)) => {
                let max = max_digits_value(w.saturating_sub(2));
                let mag = if overflow(v.unsigned_abs() <= max)? {
                    max
                } else {
                    v.unsigned_abs()
                };
                let sign = if v < 0 { '-' } else { '+' };
                write!(line, "{sign}{:0iw$}.{}", mag / 10, mag % 10, iw = w.saturating_sub(3))
            }
            (FieldKind::Count, FieldValue::Count(v)) => {
                let max = max_digits_value(w);
                let v = if overflow(v <= max)? { max } else { v };
                write!(line, "{v:0w$}")
            }
            (FieldKind::Label, FieldValue::Label(s)) => {
                if !s.bytes().all(|b| b.is_ascii_lowercase()) || s.is_empty() {
                    return Err(spec.error(FieldProblem::Malformed));
                }
                let s = if overflow(s.len() <= w)? { &s[..w] } else { s };
                write!(line, "{s:>w$}")
            }
            (FieldKind::Text, FieldValue::Text(s)) => {
                if !s.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
                    return Err(spec.error(FieldProblem::Malformed));
                }
                let s = if overflow(s.len() <= w)? { &s[..w] } else { s };
                write!(line, "{s:<w$}")
            }
            _ => return Err(spec.error(FieldProblem::KindMismatch)),
        };
        written.map_err(|_| RecordError::LineTooLong)
    }
}

/// Largest number `digits` decimal digits can hold.
fn max_digits_value(digits: usize) -> u32 {
    u32::try_from(digits)
        .ok()
        .and_then(|d| 10u32.checked_pow(d))
        .map_or(u32::MAX, |p| p - 1)
}

/// All-digit slice to its value.  Rejects signs, spaces and empty input.
fn digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 9 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        raw.bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')),
    )
}

/// `NN.N` (any integer width) to tenths.
fn tenths(raw: &str) -> Option<u32> {
    let (int, frac) = raw.split_at_checked(raw.len().checked_sub(2)?)?;
    let frac = frac.strip_prefix('.')?;
    Some(digits(int)? * 10 + digits(frac)?)
}

fn decode<'a>(spec: &FieldSpec, raw: &'a str) -> Result<FieldValue<'a>, RecordError> {
    let malformed = || spec.error(FieldProblem::Malformed);
    match spec.kind {
        FieldKind::Clock => {
            let (h, m) = raw.split_once(':').ok_or_else(malformed)?;
            if h.len() != 2 || m.len() != 2 {
                return Err(malformed());
            }
            let h = digits(h).ok_or_else(malformed)?;
            let m = digits(m).ok_or_else(malformed)?;
            TimeOfDay::new(h as u8, m as u8)
                .map(FieldValue::Clock)
                .ok_or(spec.error(FieldProblem::OutOfRange))
        }
        FieldKind::Date(order) => {
            let mut parts = raw.split('/');
            let (Some(a), Some(b), Some(y), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(malformed());
            };
            if a.len() != 2 || b.len() != 2 || y.len() != 4 {
                return Err(malformed());
            }
            let a = digits(a).ok_or_else(malformed)? as u8;
            let b = digits(b).ok_or_else(malformed)? as u8;
            let year = digits(y).ok_or_else(malformed)? as u16;
            let (month, day) = match order {
                DateOrder::MonthDayYear => (a, b),
                DateOrder::DayMonthYear => (b, a),
            };
            Ok(FieldValue::Date(CalendarDate { year, month, day }))
        }
        FieldKind::Tenths => tenths(raw)
            .map(FieldValue::Tenths)
            .ok_or_else(malformed),
        FieldKind::SignedTenths => {
            let (negative, rest) = match raw.as_bytes().first() {
                Some(b'+') => (false, &raw[1..]),
                Some(b'-') => (true, &raw[1..]),
                _ => return Err(malformed()),
            };
            let mag = tenths(rest).ok_or_else(malformed)? as i32;
            Ok(FieldValue::SignedTenths(if negative { -mag } else { mag }))
        }
        FieldKind::Count => digits(raw).map(FieldValue::Count).ok_or_else(malformed),
        FieldKind::Label => {
            let word = raw.trim_start_matches(' ');
            if word.is_empty() || !word.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(malformed());
            }
            Ok(FieldValue::Label(word))
        }
        FieldKind::Text => {
            if !raw.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
                return Err(malformed());
            }
            Ok(FieldValue::Text(raw.trim_end_matches(' ')))
        }
    }
}
