//! Shared fixtures for integration tests.
//!
//! Builders fill in the fields a scenario does not care about, so tests
//! read as deltas from one standard roster.

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};

use lsm_rust::api::{
    Catalog, CourseId, CourseInfo, LecturerId, LecturerInfo, RoomId, RoomInfo, ScheduleRequest,
    WeekdayPattern,
};
use lsm_rust::db::models::NewClass;

pub fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Three rooms, three lecturers, three courses. Every lecturer teaches
/// "english", so each one is a valid substitute on the suggestion
/// search's lecturer axis.
pub fn sample_catalog() -> Catalog {
    Catalog {
        rooms: vec![
            RoomInfo {
                id: RoomId::new(101),
                name: "Room 101".to_string(),
                capacity: 20,
            },
            RoomInfo {
                id: RoomId::new(102),
                name: "Room 102".to_string(),
                capacity: 24,
            },
            RoomInfo {
                id: RoomId::new(103),
                name: "Room 103".to_string(),
                capacity: 24,
            },
        ],
        lecturers: vec![
            LecturerInfo {
                id: LecturerId::new(1),
                name: "Anna".to_string(),
                subjects: vec!["english".to_string()],
            },
            LecturerInfo {
                id: LecturerId::new(2),
                name: "Bao".to_string(),
                subjects: vec!["english".to_string()],
            },
            LecturerInfo {
                id: LecturerId::new(3),
                name: "Chi".to_string(),
                subjects: vec!["english".to_string()],
            },
        ],
        courses: vec![
            CourseInfo {
                id: CourseId::new(1),
                name: "General English".to_string(),
                subject: "english".to_string(),
                total_sessions: 26,
                active: true,
            },
            CourseInfo {
                id: CourseId::new(2),
                name: "Evening English".to_string(),
                subject: "english".to_string(),
                total_sessions: 24,
                active: true,
            },
            CourseInfo {
                id: CourseId::new(3),
                name: "Legacy English".to_string(),
                subject: "english".to_string(),
                total_sessions: 12,
                active: false,
            },
        ],
    }
}

/// Draft for a Mon/Wed/Fri 18:00-20:00 class of the 26-session course
/// starting 2025-01-01. Scenarios vary the slot through the arguments.
pub fn class_draft(name: &str, room: i64, lecturer: i64) -> NewClass {
    NewClass {
        name: name.to_string(),
        course_id: CourseId::new(1),
        lecturer_id: LecturerId::new(lecturer),
        room_id: RoomId::new(room),
        pattern: WeekdayPattern::parse("2-4-6").unwrap(),
        start_time: t(18, 0),
        duration_minutes: 120,
        start_date: d(2025, 1, 1),
        note: None,
    }
}

/// Availability check over the same Mon/Wed/Fri range the drafts book,
/// 2025-01-01 through 2025-03-01.
pub fn schedule_request(
    room: i64,
    lecturer: i64,
    start: NaiveTime,
    minutes: i64,
) -> ScheduleRequest {
    ScheduleRequest {
        pattern: WeekdayPattern::parse("2-4-6").unwrap(),
        start_time: start,
        duration_minutes: minutes,
        start_date: d(2025, 1, 1),
        end_date: d(2025, 3, 1),
        room_id: RoomId::new(room),
        lecturer_id: LecturerId::new(lecturer),
        course_id: Some(CourseId::new(1)),
        ignore_class: None,
    }
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with one environment variable set (`Some`) or removed
/// (`None`), restoring the previous value afterwards even on unwind.
/// Access is serialized so parallel tests do not race on the process
/// environment.
pub fn with_env_var<F, R>(key: &str, value: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = RestoreVar {
        key: key.to_string(),
        previous: std::env::var(key).ok(),
    };
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
    f()
}

struct RestoreVar {
    key: String,
    previous: Option<String>,
}

impl Drop for RestoreVar {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(v) => std::env::set_var(&self.key, v),
            None => std::env::remove_var(&self.key),
        }
    }
}
