//! Validation errors for schedule requests.

use chrono::NaiveTime;

/// Errors raised while validating or expanding a schedule request.
///
/// Conflicts are not errors: a request that collides with existing
/// bookings is a normal outcome reported through the check response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Session length is zero or negative, or the session would run past
    /// midnight into the next calendar day.
    #[error("invalid session duration: {minutes} minutes starting at {start}")]
    InvalidDuration { start: NaiveTime, minutes: i64 },

    /// The weekday pattern string could not be parsed.
    #[error("invalid weekday pattern {input:?}")]
    InvalidPattern { input: String },

    /// A time-of-day string could not be parsed.
    #[error("invalid time of day {input:?}")]
    InvalidTime { input: String },
}
