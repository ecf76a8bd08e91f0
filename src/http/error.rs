//! Error responses for the HTTP layer.
//!
//! Repository outcomes map onto statuses by variant, never by sniffing
//! message text. Conflict outcomes are not flattened into a string: the
//! 409 body carries the colliding sessions and the ranked alternatives
//! so the client can render them directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::dto::SuggestionCandidateDto;
use crate::db::repository::RepositoryError;
use crate::engine::conflict::SessionConflict;
use crate::models::error::ScheduleError;

/// Plain error body: a stable machine-readable code plus a message.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// 409 body for booking collisions.
///
/// `code` distinguishes a conflicting request (`SCHEDULE_CONFLICT`) from
/// a check that went stale before its commit (`COMMIT_RACE`); for the
/// latter the client should re-run the availability check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub code: String,
    pub message: String,
    /// Every colliding occurrence, in date order
    pub conflicts: Vec<SessionConflict>,
    /// Ranked conflict-free alternatives; empty on a commit race
    pub suggestions: Vec<SuggestionCandidateDto>,
}

/// Errors a handler can surface.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => plain(StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
            AppError::Internal(message) => {
                plain(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
            }
            AppError::Repository(err) => repository_response(err),
        }
    }
}

fn plain(status: StatusCode, code: &str, message: String) -> Response {
    let body = ApiError {
        code: code.to_string(),
        message,
    };
    (status, Json(body)).into_response()
}

fn conflict(
    code: &str,
    message: String,
    conflicts: Vec<SessionConflict>,
    suggestions: Vec<SuggestionCandidateDto>,
) -> Response {
    let body = ConflictResponse {
        code: code.to_string(),
        message,
        conflicts,
        suggestions,
    };
    (StatusCode::CONFLICT, Json(body)).into_response()
}

/// Map repository outcomes onto HTTP statuses.
fn repository_response(err: RepositoryError) -> Response {
    match err {
        RepositoryError::NotFound { message, .. } => {
            plain(StatusCode::NOT_FOUND, "NOT_FOUND", message)
        }
        RepositoryError::ValidationError { message, .. } => {
            plain(StatusCode::BAD_REQUEST, "VALIDATION", message)
        }
        RepositoryError::ConflictDetected {
            message,
            conflicts,
            suggestions,
            ..
        } => conflict(
            "SCHEDULE_CONFLICT",
            message,
            conflicts,
            suggestions.into_iter().map(Into::into).collect(),
        ),
        RepositoryError::CommitRace {
            message, conflicts, ..
        } => conflict("COMMIT_RACE", message, conflicts, Vec::new()),
        RepositoryError::InternalError { message, .. } => {
            plain(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

/// Malformed patterns, times and durations are client errors.
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
