//! Reference data for rooms, lecturers and courses.
//!
//! The catalog feeds the suggestion search (candidate rooms and
//! lecturers) and the filter dropdowns in the admin UI.

use serde::{Deserialize, Serialize};

use crate::api::{CourseId, LecturerId, RoomId};

/// A bookable room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
}

/// A teaching staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerInfo {
    pub id: LecturerId,
    pub name: String,
    /// Subjects this lecturer is qualified to teach.
    pub subjects: Vec<String>,
}

/// A course offered by the school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: CourseId,
    pub name: String,
    pub subject: String,
    /// Number of sessions a class of this course runs for. Determines the
    /// end date of new classes.
    pub total_sessions: u32,
    pub active: bool,
}

/// Snapshot of the reference catalog used during a suggestion search.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub rooms: Vec<RoomInfo>,
    pub lecturers: Vec<LecturerInfo>,
    pub courses: Vec<CourseInfo>,
}

impl Catalog {
    pub fn room(&self, id: RoomId) -> Option<&RoomInfo> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn lecturer(&self, id: LecturerId) -> Option<&LecturerInfo> {
        self.lecturers.iter().find(|l| l.id == id)
    }

    pub fn course(&self, id: CourseId) -> Option<&CourseInfo> {
        self.courses.iter().find(|c| c.id == id)
    }
}
