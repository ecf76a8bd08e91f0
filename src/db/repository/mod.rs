//! Repository trait definitions for storage operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract storage operations. By splitting responsibilities across
//! multiple traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`class`]: Class CRUD and lifecycle operations
//! - [`schedule`]: Availability checks and the weekly timetable view
//! - [`catalog`]: Reference data (rooms, lecturers, courses)
//!
//! # Trait Composition
//!
//! A complete repository implementation implements all traits:
//!
//! ```ignore
//! impl ClassRepository for MyRepo { ... }
//! impl ScheduleRepository for MyRepo { ... }
//! impl CatalogRepository for MyRepo { ... }
//! ```
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service(repo: &dyn FullRepository) -> RepositoryResult<()> {
//!     let outcome = repo.check_schedule(&request).await?;
//!     repo.create_class(draft, Some(&outcome.roster_token)).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod class;
pub mod error;
pub mod schedule;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use catalog::CatalogRepository;
pub use class::ClassRepository;
pub use schedule::ScheduleRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all three repository traits. Use this as a convenient bound when you
/// need access to all repository operations.
pub trait FullRepository: ClassRepository + ScheduleRepository + CatalogRepository {}

// Blanket implementation: any type implementing all three traits automatically implements FullRepository
impl<T> FullRepository for T where T: ClassRepository + ScheduleRepository + CatalogRepository {}
