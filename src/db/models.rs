//! Shared data models re-exported for database layer consumers, plus the
//! query and view types that only exist at the storage boundary.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub use crate::api::{ClassId, CourseId, LecturerId, RoomId};
pub use crate::engine::conflict::SessionConflict;
pub use crate::engine::suggest::SuggestionCandidate;
pub use crate::models::catalog::{Catalog, CourseInfo, LecturerInfo, RoomInfo};
pub use crate::models::class::{ClassStatus, CourseClass, ScheduleRequest, Session};
pub use crate::models::pattern::WeekdayPattern;
pub use crate::models::time::{DayPeriod, TimeSpan};

/// Payload for creating a class, or fully replacing one on update.
///
/// The store assigns the id and derives the end date from the course's
/// total session count, so neither appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    pub course_id: CourseId,
    pub lecturer_id: LecturerId,
    pub room_id: RoomId,
    pub pattern: WeekdayPattern,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Optional filters for class listings and the weekly view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFilter {
    pub course_id: Option<CourseId>,
    pub lecturer_id: Option<LecturerId>,
    pub room_id: Option<RoomId>,
    /// Case-insensitive substring match on the class name.
    pub class_name: Option<String>,
    pub status: Option<ClassStatus>,
}

impl ClassFilter {
    /// Whether a class passes every set filter.
    pub fn matches(&self, class: &CourseClass) -> bool {
        if let Some(course_id) = self.course_id {
            if class.course_id != course_id {
                return false;
            }
        }
        if let Some(lecturer_id) = self.lecturer_id {
            if class.lecturer_id != lecturer_id {
                return false;
            }
        }
        if let Some(room_id) = self.room_id {
            if class.room_id != room_id {
                return false;
            }
        }
        if let Some(ref needle) = self.class_name {
            if !class
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(status) = self.status {
            if class.status != status {
                return false;
            }
        }
        true
    }
}

/// 1-based page request for listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

/// One page of classes plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPage {
    pub items: Vec<CourseClass>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Outcome of a schedule availability check.
///
/// `roster_token` fingerprints the booking roster the check ran against;
/// a later mutation can present it to detect that the check went stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCheckOutcome {
    pub conflicts: Vec<SessionConflict>,
    pub suggestions: Vec<SuggestionCandidate>,
    pub roster_token: String,
}

impl ScheduleCheckOutcome {
    pub fn has_conflict(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// One class occurrence as shown on the weekly timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub class_id: ClassId,
    pub class_name: String,
    pub course_name: String,
    pub room_name: String,
    pub lecturer_name: String,
    pub span: TimeSpan,
    pub status: ClassStatus,
}

/// Sessions of one daypart, in start order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSessions {
    pub period: DayPeriod,
    pub sessions: Vec<SessionView>,
}

/// One day of the weekly view. Always carries all three dayparts, empty
/// lists included, so clients can render a fixed grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub periods: Vec<PeriodSessions>,
}

/// Monday-to-Sunday timetable around a pivot date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DaySchedule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn class(name: &str, course: i64, lecturer: i64, room: i64) -> CourseClass {
        CourseClass {
            id: ClassId::new(1),
            name: name.to_string(),
            course_id: CourseId::new(course),
            lecturer_id: LecturerId::new(lecturer),
            room_id: RoomId::new(room),
            pattern: WeekdayPattern::parse("2-4-6").unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration_minutes: 120,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
            status: ClassStatus::Planned,
            note: None,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ClassFilter::default();
        assert!(filter.matches(&class("IELTS-A", 1, 2, 3)));
    }

    #[test]
    fn test_filter_by_ids() {
        let filter = ClassFilter {
            course_id: Some(CourseId::new(1)),
            room_id: Some(RoomId::new(3)),
            ..Default::default()
        };
        assert!(filter.matches(&class("IELTS-A", 1, 2, 3)));
        assert!(!filter.matches(&class("IELTS-A", 1, 2, 4)));
        assert!(!filter.matches(&class("IELTS-A", 9, 2, 3)));
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let filter = ClassFilter {
            class_name: Some("ielts".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&class("IELTS-A", 1, 2, 3)));
        assert!(!filter.matches(&class("TOEIC-B", 1, 2, 3)));
    }

    #[test]
    fn test_filter_by_status() {
        let filter = ClassFilter {
            status: Some(ClassStatus::Active),
            ..Default::default()
        };
        assert!(!filter.matches(&class("IELTS-A", 1, 2, 3)));
    }
}
