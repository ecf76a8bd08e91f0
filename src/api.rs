//! Public API surface for the scheduling backend.
//!
//! The identifier newtypes live here, together with re-exports of the
//! engine and model types callers work with, so downstream code can
//! import everything from one path.

pub use crate::engine::conflict::{ConflictReason, SessionConflict};
pub use crate::engine::index::{BookedSlot, BookingIndex};
pub use crate::engine::policy::SuggestPolicy;
pub use crate::engine::suggest::{SuggestionCandidate, SuggestionChange};
pub use crate::models::catalog::{Catalog, CourseInfo, LecturerInfo, RoomInfo};
pub use crate::models::class::{ClassStatus, CourseClass, ScheduleRequest, Session};
pub use crate::models::error::ScheduleError;
pub use crate::models::pattern::WeekdayPattern;
pub use crate::models::time::{DayPeriod, OperatingWindow, TimeSpan};

use serde::{Deserialize, Serialize};

/// Defines an integer-backed identifier newtype.
///
/// Ids serialize as their bare integer, so JSON payloads and database
/// rows carry plain numbers rather than wrapper objects.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Course class identifier (database primary key).
    ClassId
}

define_id! {
    /// Room identifier.
    RoomId
}

define_id! {
    /// Lecturer identifier.
    LecturerId
}

define_id! {
    /// Course identifier.
    CourseId
}

#[cfg(test)]
mod tests {
    use super::{ClassId, CourseId, LecturerId, RoomId};

    #[test]
    fn test_ids_wrap_their_value() {
        assert_eq!(ClassId::new(42).value(), 42);
        assert_eq!(RoomId::new(101).value(), 101);
        assert_eq!(LecturerId::new(7).value(), 7);
        assert_eq!(CourseId::new(0).value(), 0);
    }

    #[test]
    fn test_ids_compare_by_value() {
        assert_eq!(ClassId::new(100), ClassId::new(100));
        assert_ne!(ClassId::new(100), ClassId::new(101));
        assert!(ClassId::new(1) < ClassId::new(2));
    }

    #[test]
    fn test_ids_hash_by_value() {
        use std::collections::HashSet;

        let set: HashSet<ClassId> = [1, 2, 1].into_iter().map(ClassId::new).collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_is_the_bare_number() {
        assert_eq!(ClassId::new(7).to_string(), "7");
        assert_eq!(RoomId::new(-3).to_string(), "-3");
    }

    #[test]
    fn test_ids_serialize_as_bare_integers() {
        let value = serde_json::to_value(RoomId::new(102)).unwrap();
        assert_eq!(value, serde_json::json!(102));

        let back: RoomId = serde_json::from_value(value).unwrap();
        assert_eq!(back, RoomId::new(102));
    }
}
