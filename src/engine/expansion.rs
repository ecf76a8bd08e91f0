//! Session expansion: pattern × date range → dated sessions.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::models::class::{ScheduleRequest, Session};
use crate::models::error::ScheduleError;
use crate::models::pattern::WeekdayPattern;
use crate::models::time::TimeSpan;

/// Build the concrete time span for a session, validating the duration.
///
/// Rejects zero and negative lengths, and any session that would run
/// past midnight into the next calendar day. Sessions ending exactly at
/// midnight are rejected too: spans are half-open within a single day.
pub fn session_span(start: NaiveTime, duration_minutes: i64) -> Result<TimeSpan, ScheduleError> {
    let invalid = ScheduleError::InvalidDuration {
        start,
        minutes: duration_minutes,
    };

    if duration_minutes <= 0 || duration_minutes >= 24 * 60 {
        return Err(invalid);
    }
    // NaiveTime arithmetic wraps at midnight, which shows up as a
    // non-increasing end.
    let end = start + Duration::minutes(duration_minutes);
    TimeSpan::new(start, end).ok_or(invalid)
}

/// Expand a schedule request into its dated sessions.
///
/// Dates run from `start_date` through `end_date` inclusive and only
/// weekdays in the pattern produce a session. An inverted range yields
/// no sessions rather than an error, so callers can surface "nothing to
/// book" instead of failing the whole request. Duration validation runs
/// first regardless.
pub fn expand_sessions(request: &ScheduleRequest) -> Result<Vec<Session>, ScheduleError> {
    let span = session_span(request.start_time, request.duration_minutes)?;

    let sessions = request
        .start_date
        .iter_days()
        .take_while(|date| *date <= request.end_date)
        .filter(|date| request.pattern.contains(date.weekday()))
        .map(|date| Session { date, span })
        .collect();
    Ok(sessions)
}

/// Date of the last session when a class meets `total_sessions` times
/// starting from `start_date` on the given pattern.
///
/// Classes created through the admin UI carry no end date; it is derived
/// here from the course's session count. A zero count collapses the
/// class to its start date.
pub fn end_date_for_sessions(
    pattern: &WeekdayPattern,
    start_date: NaiveDate,
    total_sessions: u32,
) -> NaiveDate {
    if total_sessions == 0 {
        return start_date;
    }

    let mut remaining = total_sessions;
    let mut date = start_date;
    loop {
        if pattern.contains(date.weekday()) {
            remaining -= 1;
            if remaining == 0 {
                return date;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            // End of the supported calendar; unreachable for real inputs.
            None => return date,
        }
    }
}
