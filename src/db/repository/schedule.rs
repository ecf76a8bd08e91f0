//! Schedule repository trait: the engine boundary.
//!
//! These operations run the expansion/conflict/suggestion pipeline against
//! the store's current bookings without mutating anything.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::db::models::{ClassFilter, ScheduleCheckOutcome, ScheduleRequest, WeeklySchedule};

/// Repository trait for read-only schedule computations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Check a requested schedule against current bookings.
    ///
    /// # Returns
    /// * `Ok(ScheduleCheckOutcome)` - Every colliding occurrence, ranked
    ///   conflict-free alternatives when there are collisions, and the
    ///   roster token the check ran against
    /// * `Err(RepositoryError::ValidationError)` - Malformed schedule
    ///   (zero or midnight-crossing duration)
    ///
    /// A reversed date range is not an error: it checks zero sessions and
    /// comes back conflict-free.
    async fn check_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> RepositoryResult<ScheduleCheckOutcome>;

    /// The Monday-to-Sunday timetable of the week containing `date`,
    /// restricted by `filter`.
    async fn weekly_schedule(
        &self,
        date: NaiveDate,
        filter: &ClassFilter,
    ) -> RepositoryResult<WeeklySchedule>;

    /// Current roster fingerprint; changes whenever any booking changes.
    async fn roster_token(&self) -> RepositoryResult<String>;
}
