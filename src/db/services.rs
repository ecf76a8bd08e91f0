//! Service layer over the repository traits.
//!
//! Every function here is generic over the backend and adds the
//! cross-cutting behavior that must not vary between backends: request
//! logging and the sanity warnings around odd inputs. HTTP handlers and
//! the demo seeding path both call these rather than the traits
//! directly.
//!
//! ```no_run
//! use lsm_rust::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let healthy = services::health_check(&repo).await?;
//!     println!("Repository healthy: {}", healthy);
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use log::{info, warn};

use super::models::{
    Catalog, ClassFilter, ClassPage, ClassStatus, CourseClass, CourseInfo, LecturerInfo, NewClass,
    PageRequest, RoomInfo, ScheduleCheckOutcome, ScheduleRequest, Session, WeeklySchedule,
};
use super::repository::{FullRepository, RepositoryResult};
use crate::api::{ClassId, CourseId};

// ==================== Health & Connection ====================

/// Check if the repository is healthy.
///
/// This is a simple pass-through to the repository's health check.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(true)` if the store is healthy
/// * `Err` if the check fails
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Schedule Operations ====================

/// Check a prospective schedule for conflicts and collect suggestions.
///
/// This runs the full availability check: the request is expanded into
/// dated sessions, every colliding booking is collected, and when
/// conflicts exist a ranked list of conflict-free alternatives is
/// attached. The returned roster token can be handed back on the commit
/// to detect bookings that land in between.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `request` - The schedule to validate
///
/// # Returns
/// * `Ok(ScheduleCheckOutcome)` - Conflicts, suggestions and roster token
/// * `Err` if the request itself is malformed (bad duration or pattern)
pub async fn check_and_suggest<R: FullRepository + ?Sized>(
    repo: &R,
    request: &ScheduleRequest,
) -> RepositoryResult<ScheduleCheckOutcome> {
    info!(
        "Service layer: checking {} at {} ({} min) in room {} with lecturer {}",
        request.pattern,
        request.start_time.format("%H:%M"),
        request.duration_minutes,
        request.room_id,
        request.lecturer_id,
    );
    if request.start_date > request.end_date {
        warn!(
            "Service layer: range {}..{} is reversed and expands to no sessions",
            request.start_date, request.end_date,
        );
    }

    let outcome = repo.check_schedule(request).await?;
    if outcome.has_conflict() {
        info!(
            "Service layer: found {} conflicting sessions, offering {} alternatives",
            outcome.conflicts.len(),
            outcome.suggestions.len(),
        );
    }
    Ok(outcome)
}

/// Render the timetable for the week containing `date`.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `date` - Any date inside the requested week
/// * `filter` - Optional room/lecturer/course narrowing
///
/// # Returns
/// * `Ok(WeeklySchedule)` - Monday-to-Sunday grid of daypart buckets
/// * `Err` if the query fails
pub async fn weekly_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    date: NaiveDate,
    filter: &ClassFilter,
) -> RepositoryResult<WeeklySchedule> {
    info!("Service layer: building weekly schedule around {}", date);
    repo.weekly_schedule(date, filter).await
}

/// Fetch the current roster token without running a check.
pub async fn roster_token<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<String> {
    repo.roster_token().await
}

// ==================== Class Operations ====================

/// Create a new class after a conflict check against the live roster.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `new` - The class draft to store
/// * `roster_token` - Token from a prior availability check, if any
///
/// # Returns
/// * `Ok(CourseClass)` - The stored class with its assigned id
/// * `Err(ConflictDetected)` if the slot is taken, with suggestions attached
/// * `Err(CommitRace)` if bookings changed since the token was issued
pub async fn create_class<R: FullRepository + ?Sized>(
    repo: &R,
    new: NewClass,
    roster_token: Option<&str>,
) -> RepositoryResult<CourseClass> {
    info!(
        "Service layer: creating class '{}' ({} at {}, room {}, lecturer {})",
        new.name,
        new.pattern,
        new.start_time.format("%H:%M"),
        new.room_id,
        new.lecturer_id,
    );

    let class = repo.create_class(new, roster_token).await?;
    info!(
        "Service layer: created class id={} '{}' running {}..{}",
        class.id, class.name, class.start_date, class.end_date,
    );
    Ok(class)
}

/// Retrieve a single class by id.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `class_id` - The id of the class to retrieve
///
/// # Returns
/// * `Ok(CourseClass)` - The stored class
/// * `Err` if the class is not found
pub async fn get_class<R: FullRepository + ?Sized>(
    repo: &R,
    class_id: ClassId,
) -> RepositoryResult<CourseClass> {
    info!("Service layer: loading class by id {}", class_id);
    repo.get_class(class_id).await
}

/// Replace a class's schedule and details, re-checking conflicts.
///
/// The class's own bookings are excluded from the check, so shifting a
/// class within its current slot always succeeds.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `class_id` - The class being edited
/// * `update` - The replacement draft
/// * `roster_token` - Token from a prior availability check, if any
///
/// # Returns
/// * `Ok(CourseClass)` - The updated class
/// * `Err` on unknown id, validation failure, conflict or commit race
pub async fn update_class<R: FullRepository + ?Sized>(
    repo: &R,
    class_id: ClassId,
    update: NewClass,
    roster_token: Option<&str>,
) -> RepositoryResult<CourseClass> {
    info!("Service layer: updating class id={}", class_id);
    repo.update_class(class_id, update, roster_token).await
}

/// Move a class through its lifecycle.
///
/// Cancelling or finishing a class frees its room and lecturer; moving a
/// cancelled class back to planned re-runs the conflict check first.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `class_id` - The class to transition
/// * `status` - The target status
///
/// # Returns
/// * `Ok(CourseClass)` - The class in its new status
/// * `Err` if the transition is not allowed or rebooking conflicts
pub async fn change_class_status<R: FullRepository + ?Sized>(
    repo: &R,
    class_id: ClassId,
    status: ClassStatus,
) -> RepositoryResult<CourseClass> {
    info!(
        "Service layer: moving class id={} to status {}",
        class_id,
        status.as_str(),
    );
    repo.change_status(class_id, status).await
}

/// List classes matching a filter, paginated.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `filter` - Room/lecturer/course/name/status narrowing
/// * `page` - 1-based page selection
///
/// # Returns
/// * `Ok(ClassPage)` - One page of matches plus the total count
pub async fn list_classes<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &ClassFilter,
    page: &PageRequest,
) -> RepositoryResult<ClassPage> {
    info!("Service layer: listing classes (page {})", page.page);
    repo.list_classes(filter, page).await
}

/// Expand a stored class into its dated sessions.
pub async fn sessions_for_class<R: FullRepository + ?Sized>(
    repo: &R,
    class_id: ClassId,
) -> RepositoryResult<Vec<Session>> {
    repo.sessions_for_class(class_id).await
}

// ==================== Catalog Operations ====================

/// List all rooms, ordered by id.
pub async fn list_rooms<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<RoomInfo>> {
    repo.list_rooms().await
}

/// List all lecturers, ordered by id.
pub async fn list_lecturers<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<LecturerInfo>> {
    repo.list_lecturers().await
}

/// List all courses, ordered by id.
pub async fn list_courses<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<CourseInfo>> {
    repo.list_courses().await
}

/// Retrieve a single course by id.
pub async fn get_course<R: FullRepository + ?Sized>(
    repo: &R,
    course_id: CourseId,
) -> RepositoryResult<CourseInfo> {
    repo.get_course(course_id).await
}

/// Replace the reference catalog.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `catalog` - The rooms, lecturers and courses to install
pub async fn seed_catalog<R: FullRepository + ?Sized>(
    repo: &R,
    catalog: Catalog,
) -> RepositoryResult<()> {
    info!(
        "Service layer: seeding catalog ({} rooms, {} lecturers, {} courses)",
        catalog.rooms.len(),
        catalog.lecturers.len(),
        catalog.courses.len(),
    );
    repo.seed_catalog(catalog).await
}
