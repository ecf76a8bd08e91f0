//! Time-of-day types for session placement.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::error::ScheduleError;

/// Half-open time interval within a single day: `[start, end)`.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSpan {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Check if a given instant lies inside this span (inclusive start, exclusive end).
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Spans that merely touch (one ends exactly when the other starts)
    /// do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Span length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Parse a wall-clock time, accepting both `HH:MM` and `HH:MM:SS`.
///
/// The admin front end sends seconds; manual callers usually do not.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| ScheduleError::InvalidTime {
            input: input.to_string(),
        })
}

/// Daypart bucket used by the weekly timetable view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 3] = [DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Evening];

    /// Bucket for a session start time. Morning runs until 12:00,
    /// afternoon until 18:00 and evening covers the rest of the day.
    pub fn of(t: NaiveTime) -> Self {
        if t.hour() < 12 {
            DayPeriod::Morning
        } else if t.hour() < 18 {
            DayPeriod::Afternoon
        } else {
            DayPeriod::Evening
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
        }
    }
}

/// Daily window within which sessions may be booked.
///
/// Suggestion candidates must fit entirely inside the window; incoming
/// requests are checked for conflicts wherever they fall.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OperatingWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Option<Self> {
        if open < close {
            Some(Self { open, close })
        } else {
            None
        }
    }

    /// Whether the whole span fits inside the window.
    pub fn admits(&self, span: &TimeSpan) -> bool {
        self.open <= span.start && span.end <= self.close
    }
}

impl Default for OperatingWindow {
    /// 07:00 to 22:00, typical language-school hours.
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}
