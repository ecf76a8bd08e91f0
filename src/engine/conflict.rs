//! Collect-all conflict detection against the booking index.
//!
//! Every overlapping booking across every requested session is reported,
//! not only the first one found, so a caller gets the complete picture of
//! what stands in the way of a schedule in a single pass.

use serde::{Deserialize, Serialize};

use crate::api::ClassId;
use crate::engine::index::BookingIndex;
use crate::models::class::{ScheduleRequest, Session};
use crate::models::time::TimeSpan;
use chrono::NaiveDate;

/// Which resource the requested session collides on.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ConflictReason {
    Room,
    Lecturer,
}

/// One requested session colliding with one existing booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConflict {
    pub reason: ConflictReason,
    pub date: NaiveDate,
    pub requested: TimeSpan,
    pub existing_class: ClassId,
    pub existing_class_name: String,
    pub existing_span: TimeSpan,
}

/// Whether any session collides at all.
///
/// Stops at the first hit, unlike `detect_conflicts`, so the suggestion
/// search can probe many candidates cheaply.
pub fn has_conflict(index: &BookingIndex, request: &ScheduleRequest, sessions: &[Session]) -> bool {
    sessions.iter().any(|session| {
        !index
            .room_overlaps(
                request.room_id,
                session.date,
                &session.span,
                request.ignore_class,
            )
            .is_empty()
            || !index
                .lecturer_overlaps(
                    request.lecturer_id,
                    session.date,
                    &session.span,
                    request.ignore_class,
                )
                .is_empty()
    })
}

/// Check every session of a request against the index and collect every
/// collision on the requested room and lecturer.
///
/// The result is sorted by date, then requested start, then reason (room
/// before lecturer), then the existing booking's start, so the same
/// situation always reports conflicts in the same order.
pub fn detect_conflicts(
    index: &BookingIndex,
    request: &ScheduleRequest,
    sessions: &[Session],
) -> Vec<SessionConflict> {
    let mut conflicts = Vec::new();

    for session in sessions {
        for slot in index.room_overlaps(
            request.room_id,
            session.date,
            &session.span,
            request.ignore_class,
        ) {
            conflicts.push(SessionConflict {
                reason: ConflictReason::Room,
                date: session.date,
                requested: session.span,
                existing_class: slot.class_id,
                existing_class_name: slot.class_name.clone(),
                existing_span: slot.span,
            });
        }
        for slot in index.lecturer_overlaps(
            request.lecturer_id,
            session.date,
            &session.span,
            request.ignore_class,
        ) {
            conflicts.push(SessionConflict {
                reason: ConflictReason::Lecturer,
                date: session.date,
                requested: session.span,
                existing_class: slot.class_id,
                existing_class_name: slot.class_name.clone(),
                existing_span: slot.span,
            });
        }
    }

    conflicts.sort_by(|a, b| {
        (a.date, a.requested.start, a.reason, a.existing_span.start)
            .cmp(&(b.date, b.requested.start, b.reason, b.existing_span.start))
    });
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CourseId, LecturerId, RoomId};
    use crate::engine::expansion::expand_sessions;
    use crate::models::class::{ClassStatus, CourseClass};
    use crate::models::pattern::WeekdayPattern;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn class(id: i64, room: i64, lecturer: i64, pattern: &str, start: NaiveTime) -> CourseClass {
        CourseClass {
            id: ClassId::new(id),
            name: format!("class-{id}"),
            course_id: CourseId::new(1),
            lecturer_id: LecturerId::new(lecturer),
            room_id: RoomId::new(room),
            pattern: WeekdayPattern::parse(pattern).unwrap(),
            start_time: start,
            duration_minutes: 120,
            start_date: d(2025, 9, 1),
            end_date: d(2025, 9, 7),
            status: ClassStatus::Planned,
            note: None,
        }
    }

    fn request(room: i64, lecturer: i64, pattern: &str, start: NaiveTime) -> ScheduleRequest {
        ScheduleRequest {
            pattern: WeekdayPattern::parse(pattern).unwrap(),
            start_time: start,
            duration_minutes: 120,
            start_date: d(2025, 9, 1),
            end_date: d(2025, 9, 7),
            room_id: RoomId::new(room),
            lecturer_id: LecturerId::new(lecturer),
            course_id: None,
            ignore_class: None,
        }
    }

    fn index_of(classes: &[CourseClass]) -> BookingIndex {
        let mut index = BookingIndex::new();
        for c in classes {
            let sessions = expand_sessions(&c.to_request()).unwrap();
            index.insert_class(c, 1, &sessions);
        }
        index
    }

    fn check(index: &BookingIndex, request: &ScheduleRequest) -> Vec<SessionConflict> {
        let sessions = expand_sessions(request).unwrap();
        detect_conflicts(index, request, &sessions)
    }

    #[test]
    fn test_no_conflicts_on_free_resources() {
        let index = index_of(&[class(1, 10, 20, "2-4-6", t(18, 0))]);
        let req = request(11, 21, "2-4-6", t(18, 0));
        assert!(check(&index, &req).is_empty());
    }

    #[test]
    fn test_has_conflict_agrees_with_detection() {
        let index = index_of(&[class(1, 10, 20, "2-4-6", t(18, 0))]);
        let busy = request(10, 21, "2-4-6", t(18, 30));
        let free = request(11, 21, "2-4-6", t(18, 30));

        let sessions = expand_sessions(&busy).unwrap();
        assert!(has_conflict(&index, &busy, &sessions));
        let sessions = expand_sessions(&free).unwrap();
        assert!(!has_conflict(&index, &free, &sessions));
    }

    #[test]
    fn test_every_overlapping_session_reported() {
        // same room, Mon/Wed/Fri within one week, shifted by 30 minutes
        let index = index_of(&[class(1, 10, 20, "2-4-6", t(18, 0))]);
        let req = request(10, 21, "2-4-6", t(18, 30));

        let conflicts = check(&index, &req);
        assert_eq!(conflicts.len(), 3);
        assert!(conflicts.iter().all(|c| c.reason == ConflictReason::Room));
        let dates: Vec<NaiveDate> = conflicts.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![d(2025, 9, 1), d(2025, 9, 3), d(2025, 9, 5)]);
    }

    #[test]
    fn test_room_and_lecturer_both_reported() {
        let index = index_of(&[class(1, 10, 20, "2", t(18, 0))]);
        let req = request(10, 20, "2", t(18, 30));

        let conflicts = check(&index, &req);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].reason, ConflictReason::Room);
        assert_eq!(conflicts[1].reason, ConflictReason::Lecturer);
        assert_eq!(conflicts[0].existing_class, ClassId::new(1));
    }

    #[test]
    fn test_lecturer_conflict_across_rooms() {
        let index = index_of(&[class(1, 10, 20, "2", t(18, 0))]);
        let req = request(11, 20, "2", t(19, 0));

        let conflicts = check(&index, &req);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].reason, ConflictReason::Lecturer);
    }

    #[test]
    fn test_ignore_class_skips_own_bookings() {
        let existing = class(1, 10, 20, "2-4-6", t(18, 0));
        let index = index_of(&[existing.clone()]);

        // rebooking the same class over its own slots
        let mut req = existing.to_request();
        req.start_time = t(18, 30);
        assert!(check(&index, &req).is_empty());
    }

    #[test]
    fn test_conflicts_sorted_by_date_start_reason() {
        let index = index_of(&[
            class(1, 10, 21, "2-4", t(18, 0)),
            class(2, 11, 20, "2-4", t(18, 0)),
        ]);
        // room of class 1, lecturer of class 2
        let req = request(10, 20, "2-4", t(18, 30));

        let conflicts = check(&index, &req);
        assert_eq!(conflicts.len(), 4);
        assert_eq!(
            conflicts
                .iter()
                .map(|c| (c.date, c.reason))
                .collect::<Vec<_>>(),
            vec![
                (d(2025, 9, 1), ConflictReason::Room),
                (d(2025, 9, 1), ConflictReason::Lecturer),
                (d(2025, 9, 3), ConflictReason::Room),
                (d(2025, 9, 3), ConflictReason::Lecturer),
            ]
        );
    }

    #[test]
    fn test_multiple_bookings_same_day_ordered_by_existing_start() {
        let mut back_to_back = class(2, 10, 21, "2", t(17, 30));
        back_to_back.duration_minutes = 90;
        let index = index_of(&[class(1, 10, 20, "2", t(19, 0)), back_to_back]);
        let mut req = request(10, 22, "2", t(17, 0));
        req.duration_minutes = 240;

        let conflicts = check(&index, &req);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].existing_class, ClassId::new(2));
        assert_eq!(conflicts[1].existing_class, ClassId::new(1));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let index = index_of(&[
            class(1, 10, 20, "2-4-6", t(18, 0)),
            class(2, 10, 21, "2-4-6", t(19, 30)),
        ]);
        let req = request(10, 22, "2-4-6", t(18, 30));

        let first = check(&index, &req);
        let second = check(&index, &req);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
