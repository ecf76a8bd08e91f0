//! Catalog repository trait for reference data.
//!
//! Rooms, lecturers and courses are read-mostly reference rows: the class
//! endpoints validate against them and the suggestion engine draws its
//! substitution candidates from them.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::CourseId;
use crate::db::models::{Catalog, CourseInfo, LecturerInfo, RoomInfo};

/// Repository trait for the reference catalog.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All rooms, ordered by id.
    async fn list_rooms(&self) -> RepositoryResult<Vec<RoomInfo>>;

    /// All lecturers, ordered by id.
    async fn list_lecturers(&self) -> RepositoryResult<Vec<LecturerInfo>>;

    /// All courses, ordered by id.
    async fn list_courses(&self) -> RepositoryResult<Vec<CourseInfo>>;

    /// A single course by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the course doesn't exist
    async fn get_course(&self, course_id: CourseId) -> RepositoryResult<CourseInfo>;

    /// Replace the whole catalog. Used at start-up seeding and in tests.
    async fn seed_catalog(&self, catalog: Catalog) -> RepositoryResult<()>;
}
