//! Core class repository trait for CRUD and lifecycle operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::ClassId;
use crate::db::models::{ClassFilter, ClassPage, ClassStatus, CourseClass, NewClass, PageRequest, Session};

/// Repository trait for class storage and lifecycle.
///
/// Mutations are commit-checked: the store re-validates the schedule
/// against its current bookings before applying, so a clean pre-check can
/// still fail here with `ConflictDetected` or `CommitRace`.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ClassRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Class Operations ====================

    /// Create a class from a draft, deriving its end date from the
    /// course's total session count.
    ///
    /// # Arguments
    /// * `new` - The class draft; the store assigns the id
    /// * `roster_token` - Token from a previous availability check; a stale
    ///   token fails fast with `CommitRace` before any re-check
    ///
    /// # Returns
    /// * `Ok(CourseClass)` - The stored class, booked into the index
    /// * `Err(RepositoryError::ConflictDetected)` - Colliding bookings, with
    ///   suggestions attached
    /// * `Err(RepositoryError::CommitRace)` - A clean check went stale
    async fn create_class(
        &self,
        new: NewClass,
        roster_token: Option<&str>,
    ) -> RepositoryResult<CourseClass>;

    /// Retrieve a class by id.
    async fn get_class(&self, class_id: ClassId) -> RepositoryResult<CourseClass>;

    /// Replace a class's schedule and descriptive fields.
    ///
    /// The class's own bookings are excluded when re-checking, so an
    /// unchanged schedule never conflicts with itself.
    async fn update_class(
        &self,
        class_id: ClassId,
        update: NewClass,
        roster_token: Option<&str>,
    ) -> RepositoryResult<CourseClass>;

    /// Move a class through its lifecycle.
    ///
    /// Allowed transitions: `Planned -> Active -> Finished`, plus
    /// `Planned | Active -> Cancelled` and `Cancelled -> Planned`.
    /// Entering a booked status re-validates against current bookings;
    /// leaving one frees the class's slots.
    async fn change_status(
        &self,
        class_id: ClassId,
        status: ClassStatus,
    ) -> RepositoryResult<CourseClass>;

    /// List classes matching a filter, paged, ordered by id.
    async fn list_classes(
        &self,
        filter: &ClassFilter,
        page: &PageRequest,
    ) -> RepositoryResult<ClassPage>;

    // ==================== Derived Data ====================

    /// Materialize every session of a class from its stored schedule.
    async fn sessions_for_class(&self, class_id: ClassId) -> RepositoryResult<Vec<Session>>;
}
