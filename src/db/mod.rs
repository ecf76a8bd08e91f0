//! Storage for classes, bookings and the reference catalog.
//!
//! Callers go through `services`, which works against the traits in
//! `repository`; `repositories::local` is the in-memory implementation
//! that backs local deployments and every test. Swapping in another
//! backend means implementing the three repository traits, nothing
//! above them changes.
//!
//! ```text
//! services  ->  ClassRepository + ScheduleRepository + CatalogRepository
//!                               |
//!                        LocalRepository
//!               (engine-backed in-memory booking index)
//! ```
//!
//! Binaries that want one shared store call [`init_repository`] once and
//! [`get_repository`] afterwards:
//!
//! ```ignore
//! use lsm_rust::db::{self, services};
//!
//! async fn rooms() -> anyhow::Result<()> {
//!     db::init_repository()?;
//!     let repo = db::get_repository()?;
//!     let rooms = services::list_rooms(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod models;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(feature = "local-repo")]
mod seed;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

// ==================== Service Layer ====================

pub use services::{
    change_class_status, check_and_suggest, create_class, get_class, health_check, list_classes,
    list_courses, list_lecturers, list_rooms, update_class, weekly_schedule,
};

// ==================== Repository Exports ====================

pub use repositories::LocalRepository;
pub use repository::{
    CatalogRepository, ClassRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, ScheduleRepository,
};

use crate::engine::policy::SuggestPolicy;
use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Process-wide repository, set on first initialization.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

#[cfg(feature = "local-repo")]
fn create_selected_repository() -> Result<Arc<dyn FullRepository>> {
    let policy = SuggestPolicy::from_env().context("Failed to load suggestion policy")?;
    let repo = LocalRepository::with_policy(policy);
    repo.seed_catalog_impl(seed::demo_catalog());
    repo.seed_classes(seed::demo_classes())
        .context("Failed to seed demo classes")?;
    Ok(Arc::new(repo) as Arc<dyn FullRepository>)
}

/// Initialize the global repository singleton, seeded with the demo
/// catalog and classes.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository()?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Borrow the shared repository, initializing it on first use.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
