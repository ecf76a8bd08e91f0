//! Service layer tests over the in-memory repository, seeded with the
//! demo fixtures the server starts with.

use chrono::{NaiveDate, NaiveTime};

use super::models::{
    ClassFilter, ClassStatus, NewClass, PageRequest, ScheduleRequest, WeekdayPattern,
};
use super::repositories::LocalRepository;
use super::repository::RepositoryError;
use super::{seed, services};
use crate::api::{ClassId, CourseId, LecturerId, RoomId};
use crate::engine::ConflictReason;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Repository preloaded with the demo catalog and the three demo classes
/// (rooms 1-3 and lecturers 1, 2 and 4 partially occupied).
fn demo_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.seed_catalog_impl(seed::demo_catalog());
    repo.seed_classes(seed::demo_classes()).unwrap();
    repo
}

fn new_class(
    name: &str,
    course: i64,
    lecturer: i64,
    room: i64,
    pattern: &str,
    start: (u32, u32),
    minutes: i64,
) -> NewClass {
    NewClass {
        name: name.to_string(),
        course_id: CourseId::new(course),
        lecturer_id: LecturerId::new(lecturer),
        room_id: RoomId::new(room),
        pattern: WeekdayPattern::parse(pattern).unwrap(),
        start_time: t(start.0, start.1),
        duration_minutes: minutes,
        start_date: d(2026, 8, 3),
        note: None,
    }
}

fn request(
    room: i64,
    lecturer: i64,
    pattern: &str,
    start: (u32, u32),
    minutes: i64,
) -> ScheduleRequest {
    ScheduleRequest {
        pattern: WeekdayPattern::parse(pattern).unwrap(),
        start_time: t(start.0, start.1),
        duration_minutes: minutes,
        start_date: d(2026, 8, 3),
        end_date: d(2026, 8, 28),
        room_id: RoomId::new(room),
        lecturer_id: LecturerId::new(lecturer),
        course_id: None,
        ignore_class: None,
    }
}

#[tokio::test]
async fn test_health_check() {
    let repo = demo_repo();
    assert!(services::health_check(&repo).await.unwrap());
}

#[tokio::test]
async fn test_check_reports_conflicts_against_demo_roster() {
    let repo = demo_repo();

    // demo class 1 holds room 3 on 2-4-6 from 17:30 to 19:30
    let outcome = services::check_and_suggest(&repo, &request(3, 3, "2-4-6", (18, 0), 90))
        .await
        .unwrap();
    assert!(outcome.has_conflict());
    // twelve weekday sessions in the four-week range, room hits only
    assert_eq!(outcome.conflicts.len(), 12);
    assert!(outcome
        .conflicts
        .iter()
        .all(|c| c.reason == ConflictReason::Room));
    assert!(!outcome.suggestions.is_empty());
    assert_eq!(outcome.roster_token.len(), 64);
}

#[tokio::test]
async fn test_check_free_slot_is_clean() {
    let repo = demo_repo();

    // room 4 and lecturer 3 are untouched by the demo roster
    let outcome = services::check_and_suggest(&repo, &request(4, 3, "2-4", (9, 0), 90))
        .await
        .unwrap();
    assert!(!outcome.has_conflict());
    assert!(outcome.suggestions.is_empty());
}

#[tokio::test]
async fn test_reversed_range_expands_to_nothing() {
    let repo = demo_repo();

    let mut req = request(3, 1, "2-4-6", (18, 0), 90);
    req.start_date = d(2026, 8, 28);
    req.end_date = d(2026, 8, 3);
    let outcome = services::check_and_suggest(&repo, &req).await.unwrap();
    assert!(!outcome.has_conflict());
}

#[tokio::test]
async fn test_create_get_update_flow() {
    let repo = demo_repo();

    let created = services::create_class(
        &repo,
        new_class("Giao tiếp cơ bản - K09", 2, 3, 4, "2-4", (9, 0), 90),
        None,
    )
    .await
    .unwrap();
    // demo classes occupy ids 1-3
    assert_eq!(created.id, ClassId::new(4));
    assert_eq!(created.status, ClassStatus::Planned);

    let fetched = services::get_class(&repo, created.id).await.unwrap();
    assert_eq!(fetched.name, "Giao tiếp cơ bản - K09");

    let updated = services::update_class(
        &repo,
        created.id,
        new_class("Giao tiếp cơ bản - K09B", 2, 3, 4, "2-4", (9, 30), 90),
        None,
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Giao tiếp cơ bản - K09B");
    assert_eq!(updated.start_time, t(9, 30));
}

#[tokio::test]
async fn test_create_conflicting_class_is_rejected() {
    let repo = demo_repo();

    // demo class 2 holds room 2 on 3-5 evenings
    let err = services::create_class(
        &repo,
        new_class("Giao tiếp tối - K01", 2, 1, 2, "3-5", (19, 30), 120),
        None,
    )
    .await
    .unwrap_err();
    match err {
        RepositoryError::ConflictDetected {
            conflicts,
            suggestions,
            ..
        } => {
            assert!(!conflicts.is_empty());
            assert!(!suggestions.is_empty());
        }
        other => panic!("expected ConflictDetected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_commit_race_with_stale_token() {
    let repo = demo_repo();

    let outcome = services::check_and_suggest(&repo, &request(4, 3, "2-4", (9, 0), 90))
        .await
        .unwrap();
    assert!(!outcome.has_conflict());

    // an unrelated booking lands before the commit
    services::create_class(
        &repo,
        new_class("TA Trẻ Em - K03", 4, 2, 1, "2-4", (10, 0), 90),
        None,
    )
    .await
    .unwrap();

    let err = services::create_class(
        &repo,
        new_class("Giao tiếp sáng - K02", 2, 3, 4, "2-4", (9, 0), 90),
        Some(&outcome.roster_token),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::CommitRace { .. }));
    assert!(err.is_retryable());

    let token = services::roster_token(&repo).await.unwrap();
    services::create_class(
        &repo,
        new_class("Giao tiếp sáng - K02", 2, 3, 4, "2-4", (9, 0), 90),
        Some(&token),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_list_classes_with_filters() {
    let repo = demo_repo();

    let all = services::list_classes(&repo, &ClassFilter::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total, 3);

    let ielts_only = ClassFilter {
        class_name: Some("ielts".to_string()),
        ..Default::default()
    };
    let filtered = services::list_classes(&repo, &ielts_only, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(filtered.total, 1);
    assert_eq!(filtered.items[0].name, "IELTS Foundation - K12");
}

#[tokio::test]
async fn test_weekly_view_buckets_demo_classes() {
    let repo = demo_repo();

    let week = services::weekly_schedule(&repo, d(2026, 8, 12), &ClassFilter::default())
        .await
        .unwrap();
    assert_eq!(week.week_start, d(2026, 8, 10));
    assert_eq!(week.days.len(), 7);

    // Monday: IELTS at 17:30 lands in the afternoon bucket
    let monday = &week.days[0];
    assert_eq!(monday.periods[1].sessions.len(), 1);
    assert_eq!(monday.periods[1].sessions[0].class_name, "IELTS Foundation - K12");
    assert_eq!(monday.periods[1].sessions[0].room_name, "Phòng 201");
    assert!(monday.periods[0].sessions.is_empty());
    assert!(monday.periods[2].sessions.is_empty());

    // Tuesday evening: the 19:30 Giao tiếp class
    let tuesday = &week.days[1];
    assert_eq!(tuesday.periods[2].sessions.len(), 1);
    assert_eq!(tuesday.periods[2].sessions[0].class_name, "Giao tiếp nâng cao - K05");

    // weekend mornings: TOEIC on Saturday and Sunday
    assert_eq!(week.days[5].periods[0].sessions.len(), 1);
    assert_eq!(week.days[6].periods[0].sessions.len(), 1);
    assert_eq!(week.days[5].periods[0].sessions[0].lecturer_name, "Trần Thị Bích");
}

#[tokio::test]
async fn test_weekly_view_honors_lecturer_filter() {
    let repo = demo_repo();

    let filter = ClassFilter {
        lecturer_id: Some(LecturerId::new(1)),
        ..Default::default()
    };
    let week = services::weekly_schedule(&repo, d(2026, 8, 12), &filter)
        .await
        .unwrap();
    let total: usize = week
        .days
        .iter()
        .flat_map(|day| day.periods.iter())
        .map(|p| p.sessions.len())
        .sum();
    // lecturer 1 teaches only the 2-4-6 IELTS class
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_cancelling_clears_the_weekly_view() {
    let repo = demo_repo();

    services::change_class_status(&repo, ClassId::new(3), ClassStatus::Cancelled)
        .await
        .unwrap();
    let week = services::weekly_schedule(&repo, d(2026, 8, 12), &ClassFilter::default())
        .await
        .unwrap();
    assert!(week.days[5].periods[0].sessions.is_empty());
    assert!(week.days[6].periods[0].sessions.is_empty());
}

#[tokio::test]
async fn test_sessions_for_demo_class() {
    let repo = demo_repo();

    let sessions = services::sessions_for_class(&repo, ClassId::new(1))
        .await
        .unwrap();
    assert_eq!(sessions.len(), 36);
    assert_eq!(sessions[0].date, d(2026, 8, 3));
}

#[tokio::test]
async fn test_catalog_listings() {
    let repo = demo_repo();

    let rooms = services::list_rooms(&repo).await.unwrap();
    assert_eq!(rooms.len(), 5);
    assert_eq!(rooms[0].name, "Phòng 101");

    let lecturers = services::list_lecturers(&repo).await.unwrap();
    assert_eq!(lecturers.len(), 4);

    let courses = services::list_courses(&repo).await.unwrap();
    assert_eq!(courses.len(), 4);

    let course = services::get_course(&repo, CourseId::new(1)).await.unwrap();
    assert_eq!(course.name, "IELTS Foundation");
    assert_eq!(course.total_sessions, 36);
}
