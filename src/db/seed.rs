//! Demo fixtures for the local backend.
//!
//! The local store starts empty, which makes the server unusable until a
//! catalog exists. `init_repository` installs these fixtures so a freshly
//! started server can check, suggest and book immediately. Real
//! deployments replace them through the catalog seeding API.

use chrono::NaiveDate;

use crate::api::{ClassId, CourseId, LecturerId, RoomId};
use crate::db::models::{
    Catalog, ClassStatus, CourseClass, CourseInfo, LecturerInfo, RoomInfo,
};
use crate::engine::expansion::end_date_for_sessions;
use crate::models::pattern::WeekdayPattern;
use crate::models::time::parse_time_of_day;

fn room(id: i64, name: &str, capacity: u32) -> RoomInfo {
    RoomInfo {
        id: RoomId::new(id),
        name: name.to_string(),
        capacity,
    }
}

fn lecturer(id: i64, name: &str, subjects: &[&str]) -> LecturerInfo {
    LecturerInfo {
        id: LecturerId::new(id),
        name: name.to_string(),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
    }
}

fn course(id: i64, name: &str, subject: &str, total_sessions: u32, active: bool) -> CourseInfo {
    CourseInfo {
        id: CourseId::new(id),
        name: name.to_string(),
        subject: subject.to_string(),
        total_sessions,
        active,
    }
}

/// The demo reference catalog.
pub(crate) fn demo_catalog() -> Catalog {
    Catalog {
        rooms: vec![
            room(1, "Phòng 101", 30),
            room(2, "Phòng 102", 30),
            room(3, "Phòng 201", 40),
            room(4, "Phòng Lab 1", 25),
            room(5, "Hội trường A", 100),
        ],
        lecturers: vec![
            lecturer(1, "Nguyễn Văn An", &["ielts", "giao-tiep"]),
            lecturer(2, "Trần Thị Bích", &["toeic", "tre-em"]),
            lecturer(3, "Lê Minh Châu", &["ielts", "toeic"]),
            lecturer(4, "Phạm Quốc Dũng", &["giao-tiep", "tre-em"]),
        ],
        courses: vec![
            course(1, "IELTS Foundation", "ielts", 36, true),
            course(2, "Tiếng Anh Giao Tiếp", "giao-tiep", 24, true),
            course(3, "Luyện thi TOEIC", "toeic", 24, true),
            course(4, "Tiếng Anh Trẻ Em", "tre-em", 24, true),
        ],
    }
}

/// A handful of demo classes on disjoint rooms and lecturers, so the
/// seeded roster starts conflict-free.
pub(crate) fn demo_classes() -> Vec<CourseClass> {
    let specs = [
        (
            1,
            "IELTS Foundation - K12",
            1,
            1,
            3,
            "2-4-6",
            "17:30",
            120,
            (2026, 8, 3),
            36,
            ClassStatus::Active,
        ),
        (
            2,
            "Giao tiếp nâng cao - K05",
            2,
            4,
            2,
            "3-5",
            "19:30",
            120,
            (2026, 8, 4),
            24,
            ClassStatus::Active,
        ),
        (
            3,
            "TOEIC 500+ - K08",
            3,
            2,
            1,
            "7-CN",
            "08:00",
            120,
            (2026, 8, 8),
            24,
            ClassStatus::Planned,
        ),
    ];

    let mut classes = Vec::with_capacity(specs.len());
    for (id, name, course, lect, room, pattern, start, minutes, (y, m, d), sessions, status) in
        specs
    {
        let Ok(pattern) = WeekdayPattern::parse(pattern) else {
            continue;
        };
        let Ok(start_time) = parse_time_of_day(start) else {
            continue;
        };
        let Some(start_date) = NaiveDate::from_ymd_opt(y, m, d) else {
            continue;
        };
        let end_date = end_date_for_sessions(&pattern, start_date, sessions);
        classes.push(CourseClass {
            id: ClassId::new(id),
            name: name.to_string(),
            course_id: CourseId::new(course),
            lecturer_id: LecturerId::new(lect),
            room_id: RoomId::new(room),
            pattern,
            start_time,
            duration_minutes: minutes,
            start_date,
            end_date,
            status,
            note: None,
        });
    }
    classes
}
