//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! existing service layer for business logic. The check and mutation
//! handlers run their conflict search on the blocking pool, since the
//! suggestion scan is CPU-bound.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;

use super::dto::{
    ClassCreationRequest, ClassDetailResponse, ClassListQuery, ClassListResponse, ClassView,
    CourseDto, CourseListResponse, HealthResponse, LecturerDto, LecturerListResponse, RoomDto,
    RoomListResponse, ScheduleCheckRequest, ScheduleSuggestionResponse, StatusChangeRequest,
    WeeklyQuery, WeeklyScheduleResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{ClassId, CourseClass, CourseId, LecturerId, RoomId, WeekdayPattern};
use crate::db::services as db_services;
use crate::engine::expansion::end_date_for_sessions;
use crate::models::class::ScheduleRequest;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Availability Check & Suggestions
// =============================================================================

/// POST /v1/schedules/check-and-suggest
///
/// Validate a proposed schedule against current bookings and, when it
/// collides, return ranked conflict-free alternatives.
pub async fn check_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleCheckRequest>,
) -> HandlerResult<ScheduleSuggestionResponse> {
    let schedule = resolve_check_request(&state, request).await?;

    let repository = Arc::clone(&state.repository);
    let handle = tokio::runtime::Handle::current();
    let outcome = tokio::task::spawn_blocking(move || {
        handle.block_on(db_services::check_and_suggest(repository.as_ref(), &schedule))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(AppError::from)?;

    Ok(Json(outcome.into()))
}

/// Resolve the wire request into a domain request, deriving the end date
/// from the course's session count when the caller left it out.
async fn resolve_check_request(
    state: &AppState,
    request: ScheduleCheckRequest,
) -> Result<ScheduleRequest, AppError> {
    let end_date = match (request.end_date, request.course_id) {
        (Some(end_date), _) => end_date,
        (None, Some(course_id)) => {
            let pattern = WeekdayPattern::parse(&request.schedule_pattern)?;
            let course =
                db_services::get_course(state.repository.as_ref(), CourseId::new(course_id))
                    .await?;
            end_date_for_sessions(&pattern, request.start_date, course.total_sessions)
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either endDate or courseId is required to bound the schedule".to_string(),
            ));
        }
    };

    Ok(request.into_schedule_request(end_date)?)
}

// =============================================================================
// Class CRUD
// =============================================================================

/// GET /v1/courseclasses
///
/// List classes with optional filters, paged and ordered by id.
pub async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<ClassListQuery>,
) -> HandlerResult<ClassListResponse> {
    let (filter, page) = query.into_parts();
    let result = db_services::list_classes(state.repository.as_ref(), &filter, &page).await?;

    let names = DisplayNames::load(&state).await?;
    let items = result.items.iter().map(|class| names.class_view(class)).collect();

    Ok(Json(ClassListResponse {
        items,
        total: result.total,
        page: result.page,
        page_size: result.page_size,
    }))
}

/// POST /v1/courseclasses
///
/// Create a class. The schedule is re-checked against current bookings at
/// commit time, so a colliding draft comes back as 409 with suggestions
/// even after a clean pre-check.
pub async fn create_class(
    State(state): State<AppState>,
    Json(request): Json<ClassCreationRequest>,
) -> Result<(axum::http::StatusCode, Json<CourseClass>), AppError> {
    let roster_token = request.roster_token.clone();
    let draft = request.into_draft()?;

    let repository = Arc::clone(&state.repository);
    let handle = tokio::runtime::Handle::current();
    let class = tokio::task::spawn_blocking(move || {
        handle.block_on(db_services::create_class(
            repository.as_ref(),
            draft,
            roster_token.as_deref(),
        ))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(AppError::from)?;

    Ok((axum::http::StatusCode::CREATED, Json(class)))
}

/// GET /v1/courseclasses/{id}
///
/// Class detail plus every materialized session of its schedule.
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ClassDetailResponse> {
    let class_id = ClassId::new(id);
    let class = db_services::get_class(state.repository.as_ref(), class_id).await?;
    let sessions = db_services::sessions_for_class(state.repository.as_ref(), class_id).await?;

    Ok(Json(ClassDetailResponse { class, sessions }))
}

/// PUT /v1/courseclasses/{id}
///
/// Replace a class's schedule and details. The class's own bookings are
/// excluded from the re-check, so an unchanged schedule never conflicts
/// with itself.
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ClassCreationRequest>,
) -> HandlerResult<CourseClass> {
    let class_id = ClassId::new(id);
    let roster_token = request.roster_token.clone();
    let draft = request.into_draft()?;

    let repository = Arc::clone(&state.repository);
    let handle = tokio::runtime::Handle::current();
    let class = tokio::task::spawn_blocking(move || {
        handle.block_on(db_services::update_class(
            repository.as_ref(),
            class_id,
            draft,
            roster_token.as_deref(),
        ))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(AppError::from)?;

    Ok(Json(class))
}

/// POST /v1/courseclasses/{id}/status
///
/// Move a class through its lifecycle. Without a body the class advances
/// to its natural next status (planned -> active -> finished); with one
/// it moves to the named status, e.g. `{"status": "cancelled"}`.
pub async fn change_class_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Option<Json<StatusChangeRequest>>,
) -> HandlerResult<CourseClass> {
    let class_id = ClassId::new(id);
    let target = match body {
        Some(Json(request)) => request.status,
        None => {
            let current = db_services::get_class(state.repository.as_ref(), class_id).await?;
            current.status.next().ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Class {} is {} and has no next status",
                    class_id,
                    current.status.as_str(),
                ))
            })?
        }
    };

    let repository = Arc::clone(&state.repository);
    let handle = tokio::runtime::Handle::current();
    let class = tokio::task::spawn_blocking(move || {
        handle.block_on(db_services::change_class_status(
            repository.as_ref(),
            class_id,
            target,
        ))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(AppError::from)?;

    Ok(Json(class))
}

// =============================================================================
// Weekly Timetable
// =============================================================================

/// GET /v1/courseclasses/schedule-by-week
///
/// Monday-to-Sunday timetable of the week containing `date` (today when
/// omitted), bucketed by day and daypart.
pub async fn weekly_schedule(
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> HandlerResult<WeeklyScheduleResponse> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let filter = query.filter();

    let weekly = db_services::weekly_schedule(state.repository.as_ref(), date, &filter).await?;

    Ok(Json(weekly.into()))
}

// =============================================================================
// Reference Catalog
// =============================================================================

/// GET /v1/rooms
///
/// All rooms, for the filter dropdowns and the create form.
pub async fn list_rooms(State(state): State<AppState>) -> HandlerResult<RoomListResponse> {
    let rooms = db_services::list_rooms(state.repository.as_ref()).await?;

    let room_dtos: Vec<RoomDto> = rooms.into_iter().map(Into::into).collect();
    let total = room_dtos.len();

    Ok(Json(RoomListResponse {
        rooms: room_dtos,
        total,
    }))
}

/// GET /v1/lecturers
///
/// All lecturers with their teachable subjects.
pub async fn list_lecturers(State(state): State<AppState>) -> HandlerResult<LecturerListResponse> {
    let lecturers = db_services::list_lecturers(state.repository.as_ref()).await?;

    let lecturer_dtos: Vec<LecturerDto> = lecturers.into_iter().map(Into::into).collect();
    let total = lecturer_dtos.len();

    Ok(Json(LecturerListResponse {
        lecturers: lecturer_dtos,
        total,
    }))
}

/// GET /v1/courses
///
/// All courses, including closed ones so existing classes stay renderable.
pub async fn list_courses(State(state): State<AppState>) -> HandlerResult<CourseListResponse> {
    let courses = db_services::list_courses(state.repository.as_ref()).await?;

    let course_dtos: Vec<CourseDto> = courses.into_iter().map(Into::into).collect();
    let total = course_dtos.len();

    Ok(Json(CourseListResponse {
        courses: course_dtos,
        total,
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Catalog names keyed by id, for turning stored classes into view rows.
struct DisplayNames {
    rooms: HashMap<RoomId, String>,
    lecturers: HashMap<LecturerId, String>,
    courses: HashMap<CourseId, String>,
}

impl DisplayNames {
    async fn load(state: &AppState) -> Result<Self, AppError> {
        let repo = state.repository.as_ref();
        let rooms = db_services::list_rooms(repo).await?;
        let lecturers = db_services::list_lecturers(repo).await?;
        let courses = db_services::list_courses(repo).await?;

        Ok(Self {
            rooms: rooms.into_iter().map(|r| (r.id, r.name)).collect(),
            lecturers: lecturers.into_iter().map(|l| (l.id, l.name)).collect(),
            courses: courses.into_iter().map(|c| (c.id, c.name)).collect(),
        })
    }

    fn class_view(&self, class: &CourseClass) -> ClassView {
        let course_name = self
            .courses
            .get(&class.course_id)
            .cloned()
            .unwrap_or_else(|| format!("course-{}", class.course_id));
        let room_name = self
            .rooms
            .get(&class.room_id)
            .cloned()
            .unwrap_or_else(|| format!("room-{}", class.room_id));
        let instructor_name = self
            .lecturers
            .get(&class.lecturer_id)
            .cloned()
            .unwrap_or_else(|| format!("lecturer-{}", class.lecturer_id));

        ClassView::from_parts(class, course_name, room_name, instructor_name)
    }
}
