//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for local deployments and tests. All data is stored in memory,
//! with the booking index kept permanently in sync with the class table.
//!
//! # Concurrency
//!
//! Reads (checks, listings, the weekly view) share an `RwLock` read guard
//! and run fully concurrently. Commits serialize per resource through two
//! sharded mutex arrays (rooms, then lecturers, ascending shard order), so
//! bookings of unrelated rooms do not queue behind each other. Under its
//! shard locks a commit re-checks the schedule against the live index
//! before applying; the brief write-lock at the end only swaps data in.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::api::{ClassId, CourseId, LecturerId, RoomId};
use crate::db::models::*;
use crate::db::repository::*;
use crate::engine::expansion::{end_date_for_sessions, expand_sessions};
use crate::engine::index::BookingIndex;
use crate::engine::policy::SuggestPolicy;
use crate::engine::{detect_conflicts, suggest_alternatives};
use crate::models::error::ScheduleError;

/// Shard count for the per-resource commit locks.
const COMMIT_SHARDS: usize = 16;

/// In-memory local repository.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// repo.seed_catalog(catalog).await?;
/// let class = repo.create_class(draft, None).await?;
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    /// Commit locks sharded by room id; always taken before lecturer shards.
    room_shards: Arc<[Mutex<()>]>,
    lecturer_shards: Arc<[Mutex<()>]>,
    policy: SuggestPolicy,
    /// Ticket counter for full index rebuilds; a rebuild holding a stale
    /// ticket abandons its half-built index.
    rebuild_generation: Arc<AtomicU64>,
}

struct LocalData {
    classes: HashMap<ClassId, CourseClass>,
    /// Booking revision per class, bumped whenever a class's occupancy
    /// changes. Feeds the roster fingerprint.
    revisions: HashMap<ClassId, u64>,
    catalog: Catalog,
    index: BookingIndex,
    next_class_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
            revisions: HashMap::new(),
            catalog: Catalog::default(),
            index: BookingIndex::new(),
            next_class_id: 1,
            is_healthy: true,
        }
    }
}

fn shard_array() -> Arc<[Mutex<()>]> {
    (0..COMMIT_SHARDS)
        .map(|_| Mutex::new(()))
        .collect::<Vec<_>>()
        .into()
}

fn shard_of(id: i64) -> usize {
    id.rem_euclid(COMMIT_SHARDS as i64) as usize
}

fn validation_from(err: ScheduleError, operation: &str) -> RepositoryError {
    RepositoryError::validation_with_context(
        err.to_string(),
        ErrorContext::new(operation).with_entity("schedule"),
    )
}

fn class_from_draft(
    id: ClassId,
    new: NewClass,
    end_date: NaiveDate,
    status: ClassStatus,
) -> CourseClass {
    CourseClass {
        id,
        name: new.name,
        course_id: new.course_id,
        lecturer_id: new.lecturer_id,
        room_id: new.room_id,
        pattern: new.pattern,
        start_time: new.start_time,
        duration_minutes: new.duration_minutes,
        start_date: new.start_date,
        end_date,
        status,
        note: new.note,
    }
}

impl LocalRepository {
    /// Create a new empty local repository with the default policy.
    pub fn new() -> Self {
        Self::with_policy(SuggestPolicy::default())
    }

    /// Create a new empty local repository with an explicit suggestion
    /// policy.
    pub fn with_policy(policy: SuggestPolicy) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            room_shards: shard_array(),
            lecturer_shards: shard_array(),
            policy,
            rebuild_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of classes stored.
    pub fn class_count(&self) -> usize {
        self.data.read().classes.len()
    }

    /// Install the reference catalog, replacing the current one.
    pub fn seed_catalog_impl(&self, catalog: Catalog) {
        self.data.write().catalog = catalog;
    }

    /// Bulk-load trusted class rows and rebuild the index from scratch.
    ///
    /// Seeding is a load-time operation: it bypasses the per-commit
    /// conflict checks and is not serialized against individual commits,
    /// so callers own the consistency of what they load and must not race
    /// it with live bookings. The rebuild itself happens outside the data
    /// lock; when a newer seed starts meanwhile, the older rebuild notices
    /// its stale ticket and abandons its result.
    pub fn seed_classes(&self, classes: Vec<CourseClass>) -> RepositoryResult<()> {
        for class in &classes {
            if class.status.is_booked() {
                expand_sessions(&class.to_request()).map_err(|e| {
                    RepositoryError::validation_with_context(
                        format!("Seeded class {} is malformed: {e}", class.id),
                        ErrorContext::new("seed_classes")
                            .with_entity("class")
                            .with_entity_id(class.id),
                    )
                })?;
            }
        }

        let rows = {
            let mut data = self.data.write();
            for class in classes {
                data.next_class_id = data.next_class_id.max(class.id.value() + 1);
                data.revisions.insert(class.id, 1);
                data.classes.insert(class.id, class);
            }
            let revisions = &data.revisions;
            data.classes
                .values()
                .map(|c| (c.clone(), revisions.get(&c.id).copied().unwrap_or(1)))
                .collect::<Vec<_>>()
        };

        let generation = self.rebuild_generation.fetch_add(1, Ordering::AcqRel) + 1;
        let built = BookingIndex::build(&rows, generation, &self.rebuild_generation)
            .map_err(|e| RepositoryError::validation(format!("Seeded class is malformed: {e}")))?;
        if let Some(index) = built {
            let mut data = self.data.write();
            if self.rebuild_generation.load(Ordering::Acquire) == generation {
                data.index = index;
            }
        }
        Ok(())
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::internal("Store is not healthy"));
        }
        Ok(())
    }

    fn get_class_impl(&self, class_id: ClassId) -> RepositoryResult<CourseClass> {
        self.data
            .read()
            .classes
            .get(&class_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Class {} not found", class_id),
                    ErrorContext::default()
                        .with_entity("class")
                        .with_entity_id(class_id),
                )
            })
    }

    /// Validate a draft against the catalog and derive the end date the
    /// stored row will carry, from the course's total session count.
    fn resolve_draft(
        data: &LocalData,
        new: &NewClass,
        operation: &str,
    ) -> RepositoryResult<NaiveDate> {
        if new.name.trim().is_empty() {
            return Err(RepositoryError::validation_with_context(
                "Class name must not be empty",
                ErrorContext::new(operation).with_entity("class"),
            ));
        }
        let course = data.catalog.course(new.course_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Course {} not found", new.course_id),
                ErrorContext::new(operation)
                    .with_entity("course")
                    .with_entity_id(new.course_id),
            )
        })?;
        if !course.active {
            return Err(RepositoryError::validation_with_context(
                format!("Course {} is closed for new classes", course.name),
                ErrorContext::new(operation)
                    .with_entity("course")
                    .with_entity_id(new.course_id),
            ));
        }
        if data.catalog.room(new.room_id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("Room {} not found", new.room_id),
                ErrorContext::new(operation)
                    .with_entity("room")
                    .with_entity_id(new.room_id),
            ));
        }
        if data.catalog.lecturer(new.lecturer_id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("Lecturer {} not found", new.lecturer_id),
                ErrorContext::new(operation)
                    .with_entity("lecturer")
                    .with_entity_id(new.lecturer_id),
            ));
        }
        Ok(end_date_for_sessions(
            &new.pattern,
            new.start_date,
            course.total_sessions,
        ))
    }

    /// Take the commit locks covering the given rooms and lecturers.
    ///
    /// Room shards are always taken before lecturer shards, ascending
    /// within each family, so overlapping commits cannot deadlock.
    fn lock_commit_shards(
        &self,
        rooms: &[RoomId],
        lecturers: &[LecturerId],
    ) -> Vec<MutexGuard<'_, ()>> {
        let mut room_shards: Vec<usize> = rooms.iter().map(|r| shard_of(r.value())).collect();
        room_shards.sort_unstable();
        room_shards.dedup();
        let mut lecturer_shards: Vec<usize> =
            lecturers.iter().map(|l| shard_of(l.value())).collect();
        lecturer_shards.sort_unstable();
        lecturer_shards.dedup();

        let mut guards = Vec::with_capacity(room_shards.len() + lecturer_shards.len());
        for shard in room_shards {
            guards.push(self.room_shards[shard].lock());
        }
        for shard in lecturer_shards {
            guards.push(self.lecturer_shards[shard].lock());
        }
        guards
    }

    /// Re-check a request against the live index under the commit locks.
    ///
    /// A stale roster token means bookings changed since the caller's
    /// availability check: that is a race, reported without re-expanding.
    /// A matching token means the index is the one the check ran against,
    /// so conflicts found now were visible then and are reported as plain
    /// conflicts with suggestions attached.
    fn recheck_for_commit(
        &self,
        data: &LocalData,
        request: &ScheduleRequest,
        roster_token: Option<&str>,
        operation: &str,
    ) -> RepositoryResult<Vec<Session>> {
        if let Some(token) = roster_token {
            if token != data.index.fingerprint() {
                return Err(RepositoryError::commit_race(
                    "Bookings changed since the availability check",
                    Vec::new(),
                )
                .with_operation(operation));
            }
        }
        let sessions = expand_sessions(request).map_err(|e| validation_from(e, operation))?;
        let conflicts = detect_conflicts(&data.index, request, &sessions);
        if conflicts.is_empty() {
            return Ok(sessions);
        }
        let suggestions = suggest_alternatives(&data.index, &data.catalog, request, &self.policy);
        Err(RepositoryError::conflict(
            "Requested schedule collides with existing bookings",
            conflicts,
            suggestions,
        )
        .with_operation(operation))
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Class Repository ====================

#[async_trait]
impl ClassRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_class(
        &self,
        new: NewClass,
        roster_token: Option<&str>,
    ) -> RepositoryResult<CourseClass> {
        self.check_health()?;
        let end_date = {
            let data = self.data.read();
            Self::resolve_draft(&data, &new, "create_class")?
        };

        let _guards = self.lock_commit_shards(&[new.room_id], &[new.lecturer_id]);

        let request = ScheduleRequest {
            pattern: new.pattern.clone(),
            start_time: new.start_time,
            duration_minutes: new.duration_minutes,
            start_date: new.start_date,
            end_date,
            room_id: new.room_id,
            lecturer_id: new.lecturer_id,
            course_id: Some(new.course_id),
            ignore_class: None,
        };
        let sessions = {
            let data = self.data.read();
            self.recheck_for_commit(&data, &request, roster_token, "create_class")?
        };

        let mut data = self.data.write();
        let id = ClassId::new(data.next_class_id);
        data.next_class_id += 1;
        let class = class_from_draft(id, new, end_date, ClassStatus::Planned);
        data.classes.insert(id, class.clone());
        data.revisions.insert(id, 1);
        data.index.insert_class(&class, 1, &sessions);
        Ok(class)
    }

    async fn get_class(&self, class_id: ClassId) -> RepositoryResult<CourseClass> {
        self.get_class_impl(class_id)
    }

    async fn update_class(
        &self,
        class_id: ClassId,
        update: NewClass,
        roster_token: Option<&str>,
    ) -> RepositoryResult<CourseClass> {
        self.check_health()?;
        let current = self.get_class_impl(class_id)?;
        let end_date = {
            let data = self.data.read();
            Self::resolve_draft(&data, &update, "update_class")?
        };

        // both the old and the new resources take part in the commit
        let _guards = self.lock_commit_shards(
            &[current.room_id, update.room_id],
            &[current.lecturer_id, update.lecturer_id],
        );

        let request = ScheduleRequest {
            pattern: update.pattern.clone(),
            start_time: update.start_time,
            duration_minutes: update.duration_minutes,
            start_date: update.start_date,
            end_date,
            room_id: update.room_id,
            lecturer_id: update.lecturer_id,
            course_id: Some(update.course_id),
            ignore_class: Some(class_id),
        };
        let booked = current.status.is_booked();
        let sessions = {
            let data = self.data.read();
            if booked {
                self.recheck_for_commit(&data, &request, roster_token, "update_class")?
            } else {
                // released classes keep schedule validation but skip the
                // conflict check, since they hold no bookings
                expand_sessions(&request).map_err(|e| validation_from(e, "update_class"))?
            }
        };

        let mut data = self.data.write();
        let class = class_from_draft(class_id, update, end_date, current.status);
        if booked {
            let revision = data.revisions.get(&class_id).copied().unwrap_or(0) + 1;
            data.index.remove_class(class_id);
            data.index.insert_class(&class, revision, &sessions);
            data.revisions.insert(class_id, revision);
        }
        data.classes.insert(class_id, class.clone());
        Ok(class)
    }

    async fn change_status(
        &self,
        class_id: ClassId,
        status: ClassStatus,
    ) -> RepositoryResult<CourseClass> {
        self.check_health()?;
        let current = self.get_class_impl(class_id)?;
        if current.status == status {
            return Ok(current);
        }

        let allowed = matches!(
            (current.status, status),
            (ClassStatus::Planned, ClassStatus::Active)
                | (ClassStatus::Active, ClassStatus::Finished)
                | (ClassStatus::Planned, ClassStatus::Cancelled)
                | (ClassStatus::Active, ClassStatus::Cancelled)
                | (ClassStatus::Cancelled, ClassStatus::Planned)
        );
        if !allowed {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "Class cannot move from {} to {}",
                    current.status.as_str(),
                    status.as_str()
                ),
                ErrorContext::new("change_status")
                    .with_entity("class")
                    .with_entity_id(class_id),
            ));
        }

        let _guards = self.lock_commit_shards(&[current.room_id], &[current.lecturer_id]);

        let was_booked = current.status.is_booked();
        let now_booked = status.is_booked();

        // rebooking a released class must pass a fresh conflict check
        let sessions = if !was_booked && now_booked {
            let data = self.data.read();
            self.recheck_for_commit(&data, &current.to_request(), None, "change_status")?
        } else {
            Vec::new()
        };

        let mut data = self.data.write();
        let class = match data.classes.get_mut(&class_id) {
            Some(class) => {
                class.status = status;
                class.clone()
            }
            None => {
                return Err(RepositoryError::not_found(format!(
                    "Class {} not found",
                    class_id
                )))
            }
        };
        if was_booked && !now_booked {
            let revision = data.revisions.get(&class_id).copied().unwrap_or(0) + 1;
            data.index.remove_class(class_id);
            data.revisions.insert(class_id, revision);
        } else if !was_booked && now_booked {
            let revision = data.revisions.get(&class_id).copied().unwrap_or(0) + 1;
            data.index.insert_class(&class, revision, &sessions);
            data.revisions.insert(class_id, revision);
        }
        Ok(class)
    }

    async fn list_classes(
        &self,
        filter: &ClassFilter,
        page: &PageRequest,
    ) -> RepositoryResult<ClassPage> {
        let data = self.data.read();
        let mut items: Vec<CourseClass> = data
            .classes
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        items.sort_by_key(|c| c.id);

        let total = items.len();
        let page_size = page.page_size.max(1);
        let page_no = page.page.max(1);
        let start = (page_no - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        Ok(ClassPage {
            items: items[start..end].to_vec(),
            total,
            page: page_no,
            page_size,
        })
    }

    async fn sessions_for_class(&self, class_id: ClassId) -> RepositoryResult<Vec<Session>> {
        let class = self.get_class_impl(class_id)?;
        expand_sessions(&class.to_request()).map_err(|e| {
            RepositoryError::internal_with_context(
                e.to_string(),
                ErrorContext::new("sessions_for_class")
                    .with_entity("class")
                    .with_entity_id(class_id),
            )
        })
    }
}

// ==================== Schedule Repository ====================

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn check_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> RepositoryResult<ScheduleCheckOutcome> {
        let data = self.data.read();
        let sessions =
            expand_sessions(request).map_err(|e| validation_from(e, "check_schedule"))?;
        let conflicts = detect_conflicts(&data.index, request, &sessions);
        let suggestions = if conflicts.is_empty() {
            Vec::new()
        } else {
            suggest_alternatives(&data.index, &data.catalog, request, &self.policy)
        };
        Ok(ScheduleCheckOutcome {
            conflicts,
            suggestions,
            roster_token: data.index.fingerprint(),
        })
    }

    async fn weekly_schedule(
        &self,
        date: NaiveDate,
        filter: &ClassFilter,
    ) -> RepositoryResult<WeeklySchedule> {
        let data = self.data.read();
        let week = date.week(Weekday::Mon);
        let week_start = week.first_day();
        let week_end = week.last_day();

        let mut day_views: Vec<Vec<SessionView>> = vec![Vec::new(); 7];
        for class in data.classes.values() {
            if class.status == ClassStatus::Cancelled || !filter.matches(class) {
                continue;
            }
            // clamp the expansion to the week instead of walking the course
            let mut request = class.to_request();
            request.start_date = request.start_date.max(week_start);
            request.end_date = request.end_date.min(week_end);
            let sessions = expand_sessions(&request).map_err(|e| {
                RepositoryError::internal_with_context(
                    e.to_string(),
                    ErrorContext::new("weekly_schedule")
                        .with_entity("class")
                        .with_entity_id(class.id),
                )
            })?;
            if sessions.is_empty() {
                continue;
            }

            let room_name = data
                .catalog
                .room(class.room_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| format!("room-{}", class.room_id));
            let lecturer_name = data
                .catalog
                .lecturer(class.lecturer_id)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| format!("lecturer-{}", class.lecturer_id));
            let course_name = data
                .catalog
                .course(class.course_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("course-{}", class.course_id));

            for session in sessions {
                let day = session.date.weekday().num_days_from_monday() as usize;
                day_views[day].push(SessionView {
                    class_id: class.id,
                    class_name: class.name.clone(),
                    course_name: course_name.clone(),
                    room_name: room_name.clone(),
                    lecturer_name: lecturer_name.clone(),
                    span: session.span,
                    status: class.status,
                });
            }
        }

        let mut days = Vec::with_capacity(7);
        for (offset, date) in week_start.iter_days().take(7).enumerate() {
            let mut views = std::mem::take(&mut day_views[offset]);
            views.sort_by(|a, b| (a.span.start, a.class_id).cmp(&(b.span.start, b.class_id)));
            let periods = DayPeriod::ALL
                .iter()
                .map(|period| PeriodSessions {
                    period: *period,
                    sessions: views
                        .iter()
                        .filter(|v| DayPeriod::of(v.span.start) == *period)
                        .cloned()
                        .collect(),
                })
                .collect();
            days.push(DaySchedule { date, periods });
        }

        Ok(WeeklySchedule {
            week_start,
            week_end,
            days,
        })
    }

    async fn roster_token(&self) -> RepositoryResult<String> {
        Ok(self.data.read().index.fingerprint())
    }
}

// ==================== Catalog Repository ====================

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn list_rooms(&self) -> RepositoryResult<Vec<RoomInfo>> {
        let mut rooms = self.data.read().catalog.rooms.clone();
        rooms.sort_by_key(|r| r.id.value());
        Ok(rooms)
    }

    async fn list_lecturers(&self) -> RepositoryResult<Vec<LecturerInfo>> {
        let mut lecturers = self.data.read().catalog.lecturers.clone();
        lecturers.sort_by_key(|l| l.id.value());
        Ok(lecturers)
    }

    async fn list_courses(&self) -> RepositoryResult<Vec<CourseInfo>> {
        let mut courses = self.data.read().catalog.courses.clone();
        courses.sort_by_key(|c| c.id.value());
        Ok(courses)
    }

    async fn get_course(&self, course_id: CourseId) -> RepositoryResult<CourseInfo> {
        self.data
            .read()
            .catalog
            .course(course_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Course {} not found", course_id),
                    ErrorContext::default()
                        .with_entity("course")
                        .with_entity_id(course_id),
                )
            })
    }

    async fn seed_catalog(&self, catalog: Catalog) -> RepositoryResult<()> {
        self.seed_catalog_impl(catalog);
        Ok(())
    }
}
