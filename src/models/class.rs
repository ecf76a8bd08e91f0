//! Course classes and their derived sessions.
//!
//! A `CourseClass` is the persisted booking: one row describing a whole
//! run of a class. Individual dated sessions are never stored; they are
//! derived from the class row on demand, so the class is the single
//! source of truth for what occupies a room and a lecturer.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::{ClassId, CourseId, LecturerId, RoomId};
use crate::models::pattern::WeekdayPattern;
use crate::models::time::TimeSpan;

/// Lifecycle status of a course class.
///
/// `Planned` and `Active` classes occupy their room and lecturer;
/// `Finished` and `Cancelled` classes release them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Planned,
    Active,
    Finished,
    Cancelled,
}

impl ClassStatus {
    /// Whether a class in this status holds bookings in the schedule index.
    pub fn is_booked(&self) -> bool {
        matches!(self, ClassStatus::Planned | ClassStatus::Active)
    }

    /// The status the single advance action moves a class to, if any.
    pub fn next(&self) -> Option<ClassStatus> {
        match self {
            ClassStatus::Planned => Some(ClassStatus::Active),
            ClassStatus::Active => Some(ClassStatus::Finished),
            ClassStatus::Finished | ClassStatus::Cancelled => None,
        }
    }

    /// Lowercase label, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Planned => "planned",
            ClassStatus::Active => "active",
            ClassStatus::Finished => "finished",
            ClassStatus::Cancelled => "cancelled",
        }
    }
}

/// A scheduled course class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseClass {
    pub id: ClassId,
    pub name: String,
    pub course_id: CourseId,
    pub lecturer_id: LecturerId,
    pub room_id: RoomId,
    /// Weekdays the class meets on.
    pub pattern: WeekdayPattern,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub start_date: NaiveDate,
    /// Last session date, derived from the course's session count at
    /// creation time and stored with the class.
    pub end_date: NaiveDate,
    pub status: ClassStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CourseClass {
    /// The schedule request equivalent to this class's booking, used when
    /// re-validating or re-indexing the class.
    pub fn to_request(&self) -> ScheduleRequest {
        ScheduleRequest {
            pattern: self.pattern.clone(),
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            start_date: self.start_date,
            end_date: self.end_date,
            room_id: self.room_id,
            lecturer_id: self.lecturer_id,
            course_id: Some(self.course_id),
            ignore_class: Some(self.id),
        }
    }
}

/// One dated occurrence of a class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    pub span: TimeSpan,
}

/// A booking to validate: either a prospective class from the check
/// endpoint or an existing class being re-checked after an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub pattern: WeekdayPattern,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: RoomId,
    pub lecturer_id: LecturerId,
    /// Course the class would belong to. Enables lecturer substitution
    /// suggestions; without it that axis is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    /// Class whose own bookings are ignored during the check, so an
    /// edited class does not conflict with itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_class: Option<ClassId>,
}
