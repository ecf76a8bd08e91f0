//! Data Transfer Objects for the HTTP API.
//!
//! Field names follow the admin front end's wire contract: camelCase keys,
//! `schedule`/`schedulePattern` for the weekday pattern string and times as
//! `"HH:mm"` or `"HH:mm:ss"`. Request DTOs parse those forms into domain
//! types before anything reaches the service layer; domain types that are
//! already wire-shaped are re-exported as-is.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// Re-export existing types that are already serializable.
pub use crate::api::{
    ClassId, ClassStatus, ConflictReason, CourseClass, CourseId, LecturerId, RoomId, Session,
    SessionConflict, SuggestionChange,
};

use crate::api::{ScheduleRequest, SuggestionCandidate, WeekdayPattern};
use crate::db::models::{
    ClassFilter, CourseInfo, DaySchedule, LecturerInfo, NewClass, PageRequest, RoomInfo,
    ScheduleCheckOutcome, SessionView, WeeklySchedule,
};
use crate::models::error::ScheduleError;
use crate::models::time::parse_time_of_day;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub database: String,
}

// =============================================================================
// Schedule check
// =============================================================================

/// Request body for the availability check.
///
/// `endDate` may be omitted when `courseId` is set; the booking is then
/// bounded by the course's total session count, the same derivation class
/// creation uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCheckRequest {
    /// Weekday pattern in the front end's form, e.g. "2-4-6" or "7-CN"
    pub schedule_pattern: String,
    /// Wall-clock start, "HH:mm" or "HH:mm:ss"
    pub start_time: String,
    pub duration_minutes: i64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub room_id: i64,
    pub lecturer_id: i64,
    #[serde(default)]
    pub course_id: Option<i64>,
    /// Set when editing an existing class, so it is not compared against
    /// its own bookings
    #[serde(default)]
    pub class_id: Option<i64>,
}

impl ScheduleCheckRequest {
    /// Build the domain request once the end date is known.
    pub fn into_schedule_request(
        self,
        end_date: NaiveDate,
    ) -> Result<ScheduleRequest, ScheduleError> {
        let pattern = WeekdayPattern::parse(&self.schedule_pattern)?;
        let start_time = parse_time_of_day(&self.start_time)?;
        Ok(ScheduleRequest {
            pattern,
            start_time,
            duration_minutes: self.duration_minutes,
            start_date: self.start_date,
            end_date,
            room_id: RoomId::new(self.room_id),
            lecturer_id: LecturerId::new(self.lecturer_id),
            course_id: self.course_id.map(CourseId::new),
            ignore_class: self.class_id.map(ClassId::new),
        })
    }
}

/// One ranked alternative, flattened for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidateDto {
    /// What changed relative to the request
    pub change: SuggestionChange,
    /// Adjusted pattern with the change applied, e.g. "T2-T4-T6"
    pub schedule_pattern: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_id: RoomId,
    pub lecturer_id: LecturerId,
    /// Deviation from the original request; lower is better
    pub score: f64,
}

impl From<SuggestionCandidate> for SuggestionCandidateDto {
    fn from(candidate: SuggestionCandidate) -> Self {
        let request = candidate.request;
        Self {
            change: candidate.change,
            schedule_pattern: request.pattern.to_string(),
            start_time: request.start_time,
            end_time: request.start_time + Duration::minutes(request.duration_minutes),
            room_id: request.room_id,
            lecturer_id: request.lecturer_id,
            score: candidate.score,
        }
    }
}

/// Response for the availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSuggestionResponse {
    pub has_conflict: bool,
    /// Every colliding occurrence, in date order
    pub conflicts: Vec<SessionConflict>,
    /// Conflict-free alternatives, best first; empty when nothing collides
    pub suggestions: Vec<SuggestionCandidateDto>,
    /// Fingerprint of the roster the check ran against. Echo it back on
    /// the mutation to fail fast if bookings changed in between.
    pub roster_token: String,
}

impl From<ScheduleCheckOutcome> for ScheduleSuggestionResponse {
    fn from(outcome: ScheduleCheckOutcome) -> Self {
        let has_conflict = outcome.has_conflict();
        Self {
            has_conflict,
            conflicts: outcome.conflicts,
            suggestions: outcome.suggestions.into_iter().map(Into::into).collect(),
            roster_token: outcome.roster_token,
        }
    }
}

// =============================================================================
// Classes
// =============================================================================

/// Request body for creating a class, field names from the admin form.
/// The same body replaces a class on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCreationRequest {
    pub course_id: i64,
    pub class_name: String,
    pub lecturer_id: i64,
    pub room_id: i64,
    /// Weekday pattern, e.g. "2-4-6"
    pub schedule: String,
    /// Wall-clock start, "HH:mm" or "HH:mm:ss"
    pub start_time: String,
    pub minutes_per_session: i64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    /// Token from a previous availability check; omit to skip the
    /// staleness guard
    #[serde(default)]
    pub roster_token: Option<String>,
}

impl ClassCreationRequest {
    /// Parse the wire fields into a storage draft.
    pub fn into_draft(self) -> Result<NewClass, ScheduleError> {
        let pattern = WeekdayPattern::parse(&self.schedule)?;
        let start_time = parse_time_of_day(&self.start_time)?;
        Ok(NewClass {
            name: self.class_name,
            course_id: CourseId::new(self.course_id),
            lecturer_id: LecturerId::new(self.lecturer_id),
            room_id: RoomId::new(self.room_id),
            pattern,
            start_time,
            duration_minutes: self.minutes_per_session,
            start_date: self.start_date,
            note: self.note,
        })
    }
}

/// One row of the class listing, names resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    pub class_id: ClassId,
    pub class_name: String,
    pub course_name: String,
    pub room_name: String,
    pub schedule_pattern: String,
    pub instructor_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ClassStatus,
}

impl ClassView {
    /// Assemble a row from the stored class and resolved display names.
    pub fn from_parts(
        class: &CourseClass,
        course_name: String,
        room_name: String,
        instructor_name: String,
    ) -> Self {
        Self {
            class_id: class.id,
            class_name: class.name.clone(),
            course_name,
            room_name,
            schedule_pattern: class.pattern.to_string(),
            instructor_name,
            start_time: class.start_time,
            end_time: class.start_time + Duration::minutes(class.duration_minutes),
            start_date: class.start_date,
            end_date: class.end_date,
            status: class.status,
        }
    }
}

/// Class list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassListResponse {
    /// One page of rows, ordered by id
    pub items: Vec<ClassView>,
    /// Total matches across all pages
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Class detail: the stored row plus its materialized sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetailResponse {
    pub class: CourseClass,
    pub sessions: Vec<Session>,
}

/// Body for the status endpoint.
///
/// The body is optional on the wire: a bare POST advances the class to
/// its natural next status instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: ClassStatus,
}

/// Query parameters for the class list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassListQuery {
    /// 1-based page number (default 1)
    #[serde(default)]
    pub page: Option<usize>,
    /// Page size (default 20)
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub lecturer_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
    /// Case-insensitive substring match on the class name
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub status: Option<ClassStatus>,
}

impl ClassListQuery {
    /// Split into the storage filter and the page selection.
    pub fn into_parts(self) -> (ClassFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.size.unwrap_or(defaults.page_size),
        };
        let filter = ClassFilter {
            course_id: self.course_id.map(CourseId::new),
            lecturer_id: self.lecturer_id.map(LecturerId::new),
            room_id: self.room_id.map(RoomId::new),
            class_name: self.class_name,
            status: self.status,
        };
        (filter, page)
    }
}

// =============================================================================
// Weekly timetable
// =============================================================================

/// Query parameters for the weekly view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyQuery {
    /// Any date inside the wanted week; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub lecturer_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub course_id: Option<i64>,
}

impl WeeklyQuery {
    /// The storage filter equivalent to these parameters.
    pub fn filter(&self) -> ClassFilter {
        ClassFilter {
            course_id: self.course_id.map(CourseId::new),
            lecturer_id: self.lecturer_id.map(LecturerId::new),
            room_id: self.room_id.map(RoomId::new),
            class_name: None,
            status: None,
        }
    }
}

/// One timetable entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySessionDto {
    pub class_id: ClassId,
    pub class_name: String,
    pub course_name: String,
    pub room_name: String,
    pub instructor_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ClassStatus,
}

impl From<SessionView> for WeeklySessionDto {
    fn from(view: SessionView) -> Self {
        Self {
            class_id: view.class_id,
            class_name: view.class_name,
            course_name: view.course_name,
            room_name: view.room_name,
            instructor_name: view.lecturer_name,
            start_time: view.span.start,
            end_time: view.span.end,
            status: view.status,
        }
    }
}

/// One daypart bucket of a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDto {
    /// "morning", "afternoon" or "evening"
    pub period: String,
    /// Entries in start order
    pub sessions: Vec<WeeklySessionDto>,
}

/// One day of the weekly grid. All three dayparts are always present,
/// empty lists included, so clients can render a fixed grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleDto {
    pub date: NaiveDate,
    /// Upper-case English day name, e.g. "MONDAY"
    pub day_name: String,
    pub periods: Vec<PeriodDto>,
}

impl From<DaySchedule> for DayScheduleDto {
    fn from(day: DaySchedule) -> Self {
        let day_name = day.date.format("%A").to_string().to_uppercase();
        let periods = day
            .periods
            .into_iter()
            .map(|bucket| PeriodDto {
                period: bucket.period.label().to_string(),
                sessions: bucket.sessions.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self {
            date: day.date,
            day_name,
            periods,
        }
    }
}

/// Weekly timetable response, Monday to Sunday.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayScheduleDto>,
}

impl From<WeeklySchedule> for WeeklyScheduleResponse {
    fn from(weekly: WeeklySchedule) -> Self {
        Self {
            week_start: weekly.week_start,
            week_end: weekly.week_end,
            days: weekly.days.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Reference catalog
// =============================================================================

/// Room row for the filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: u32,
}

impl From<RoomInfo> for RoomDto {
    fn from(room: RoomInfo) -> Self {
        Self {
            room_id: room.id,
            room_name: room.name,
            capacity: room.capacity,
        }
    }
}

/// Lecturer row for the filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerDto {
    pub lecturer_id: LecturerId,
    pub lecturer_name: String,
    /// Subjects this lecturer is qualified to teach
    pub subjects: Vec<String>,
}

impl From<LecturerInfo> for LecturerDto {
    fn from(lecturer: LecturerInfo) -> Self {
        Self {
            lecturer_id: lecturer.id,
            lecturer_name: lecturer.name,
            subjects: lecturer.subjects,
        }
    }
}

/// Course row for the create form and filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub course_id: CourseId,
    pub course_name: String,
    pub subject: String,
    /// Sessions a class of this course runs for
    pub total_sessions: u32,
    /// Whether new classes may be opened
    pub active: bool,
}

impl From<CourseInfo> for CourseDto {
    fn from(course: CourseInfo) -> Self {
        Self {
            course_id: course.id,
            course_name: course.name,
            subject: course.subject,
            total_sessions: course.total_sessions,
            active: course.active,
        }
    }
}

/// Room list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomDto>,
    pub total: usize,
}

/// Lecturer list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerListResponse {
    pub lecturers: Vec<LecturerDto>,
    pub total: usize,
}

/// Course list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseDto>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_request_parses_wire_forms() {
        let json = r#"{
            "schedulePattern": "2-4-6",
            "startTime": "18:00:00",
            "durationMinutes": 120,
            "startDate": "2025-09-01",
            "roomId": 1,
            "lecturerId": 2
        }"#;
        let dto: ScheduleCheckRequest = serde_json::from_str(json).unwrap();
        assert!(dto.end_date.is_none());

        let request = dto
            .into_schedule_request(NaiveDate::from_ymd_opt(2025, 9, 26).unwrap())
            .unwrap();
        assert_eq!(request.pattern.to_string(), "T2-T4-T6");
        assert_eq!(request.start_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(request.room_id, RoomId::new(1));
    }

    #[test]
    fn test_check_request_rejects_bad_pattern() {
        let dto = ScheduleCheckRequest {
            schedule_pattern: "2-9".to_string(),
            start_time: "18:00".to_string(),
            duration_minutes: 120,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: None,
            room_id: 1,
            lecturer_id: 1,
            course_id: None,
            class_id: None,
        };
        let end = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
        assert!(dto.into_schedule_request(end).is_err());
    }

    #[test]
    fn test_creation_request_builds_draft() {
        let json = r#"{
            "courseId": 1,
            "className": "IELTS Foundation - K13",
            "lecturerId": 3,
            "roomId": 2,
            "schedule": "3-5",
            "startTime": "19:30:00",
            "minutesPerSession": 120,
            "startDate": "2026-08-04"
        }"#;
        let dto: ClassCreationRequest = serde_json::from_str(json).unwrap();
        assert!(dto.roster_token.is_none());

        let draft = dto.into_draft().unwrap();
        assert_eq!(draft.name, "IELTS Foundation - K13");
        assert_eq!(draft.pattern.to_string(), "T3-T5");
        assert_eq!(draft.duration_minutes, 120);
    }

    #[test]
    fn test_day_name_is_uppercase_english() {
        let day = DaySchedule {
            date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            periods: Vec::new(),
        };
        let dto: DayScheduleDto = day.into();
        assert_eq!(dto.day_name, "MONDAY");
    }
}
