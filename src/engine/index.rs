//! Booking index: which class occupies which room and lecturer, when.
//!
//! The index holds one bucket of booked slots per `(resource, date)` pair,
//! separately for rooms and lecturers. Buckets stay sorted by start time
//! so overlap lookups binary-search to the first candidate instead of
//! scanning whole days.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::api::{ClassId, LecturerId, RoomId};
use crate::engine::expansion::expand_sessions;
use crate::models::class::{CourseClass, Session};
use crate::models::error::ScheduleError;
use crate::models::time::TimeSpan;

/// One booked occurrence in a resource's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub span: TimeSpan,
    pub class_id: ClassId,
    pub class_name: String,
}

/// Interval index over the booked sessions of every occupying class.
#[derive(Debug, Clone, Default)]
pub struct BookingIndex {
    rooms: HashMap<(RoomId, NaiveDate), Vec<BookedSlot>>,
    lecturers: HashMap<(LecturerId, NaiveDate), Vec<BookedSlot>>,
    /// (class, revision) pairs currently indexed; the roster fingerprint
    /// is computed over these.
    members: HashMap<ClassId, u64>,
}

impl BookingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes currently indexed.
    pub fn class_count(&self) -> usize {
        self.members.len()
    }

    /// Insert every session of a class under its room and its lecturer.
    pub fn insert_class(&mut self, class: &CourseClass, revision: u64, sessions: &[Session]) {
        for session in sessions {
            let slot = BookedSlot {
                span: session.span,
                class_id: class.id,
                class_name: class.name.clone(),
            };
            insert_sorted(
                self.rooms
                    .entry((class.room_id, session.date))
                    .or_default(),
                slot.clone(),
            );
            insert_sorted(
                self.lecturers
                    .entry((class.lecturer_id, session.date))
                    .or_default(),
                slot,
            );
        }
        self.members.insert(class.id, revision);
    }

    /// Remove every slot owned by a class, freeing its room and lecturer.
    pub fn remove_class(&mut self, class_id: ClassId) {
        self.rooms.retain(|_, slots| {
            slots.retain(|s| s.class_id != class_id);
            !slots.is_empty()
        });
        self.lecturers.retain(|_, slots| {
            slots.retain(|s| s.class_id != class_id);
            !slots.is_empty()
        });
        self.members.remove(&class_id);
    }

    /// All booked slots overlapping `span` in the given room on `date`,
    /// excluding slots owned by `ignore`.
    pub fn room_overlaps(
        &self,
        room: RoomId,
        date: NaiveDate,
        span: &TimeSpan,
        ignore: Option<ClassId>,
    ) -> Vec<&BookedSlot> {
        overlapping(self.rooms.get(&(room, date)), span, ignore)
    }

    /// All booked slots overlapping `span` for the given lecturer on `date`,
    /// excluding slots owned by `ignore`.
    pub fn lecturer_overlaps(
        &self,
        lecturer: LecturerId,
        date: NaiveDate,
        span: &TimeSpan,
        ignore: Option<ClassId>,
    ) -> Vec<&BookedSlot> {
        overlapping(self.lecturers.get(&(lecturer, date)), span, ignore)
    }

    /// Slots booked in a room on a date, in start order.
    pub fn room_day(&self, room: RoomId, date: NaiveDate) -> &[BookedSlot] {
        self.rooms
            .get(&(room, date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Slots booked for a lecturer on a date, in start order.
    pub fn lecturer_day(&self, lecturer: LecturerId, date: NaiveDate) -> &[BookedSlot] {
        self.lecturers
            .get(&(lecturer, date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hex SHA-256 over the sorted (class, revision) pairs.
    ///
    /// Any class entering, leaving or being rebooked changes the value,
    /// so a client holding an old fingerprint can be told its earlier
    /// availability check went stale.
    pub fn fingerprint(&self) -> String {
        let mut entries: Vec<(ClassId, u64)> =
            self.members.iter().map(|(id, rev)| (*id, *rev)).collect();
        entries.sort();

        let mut hasher = Sha256::new();
        for (id, revision) in entries {
            hasher.update(id.value().to_le_bytes());
            hasher.update(revision.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Rebuild an index from `(class, revision)` rows, skipping classes
    /// whose status does not occupy resources.
    ///
    /// `generation` is the rebuild's own ticket and `current` the live
    /// counter: when another rebuild has been requested meanwhile the
    /// half-built result is stale, so the work stops early and `None` is
    /// returned for the caller to discard.
    pub fn build(
        classes: &[(CourseClass, u64)],
        generation: u64,
        current: &AtomicU64,
    ) -> Result<Option<BookingIndex>, ScheduleError> {
        let mut index = BookingIndex::new();
        for (class, revision) in classes {
            if current.load(Ordering::Acquire) != generation {
                return Ok(None);
            }
            if !class.status.is_booked() {
                continue;
            }
            let sessions = expand_sessions(&class.to_request())?;
            index.insert_class(class, *revision, &sessions);
        }
        Ok(Some(index))
    }
}

fn insert_sorted(slots: &mut Vec<BookedSlot>, slot: BookedSlot) {
    let at = slots.partition_point(|s| s.span.start <= slot.span.start);
    slots.insert(at, slot);
}

fn overlapping<'a>(
    slots: Option<&'a Vec<BookedSlot>>,
    span: &TimeSpan,
    ignore: Option<ClassId>,
) -> Vec<&'a BookedSlot> {
    let slots = match slots {
        Some(slots) => slots,
        None => return Vec::new(),
    };
    // Committed slots within one bucket never overlap each other, so both
    // endpoints are monotone and the first candidate can be binary-searched.
    let from = slots.partition_point(|s| s.span.end <= span.start);
    slots[from..]
        .iter()
        .take_while(|s| s.span.start < span.end)
        .filter(|s| ignore != Some(s.class_id))
        .collect()
}
