//! Route table and middleware for the REST API.
//!
//! Everything except the health probe lives under `/v1`.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Build the application router with routes and middleware attached.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; the UI is served from another origin during
    // development. Lock this down when deploying.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", v1_routes())
        // Class payloads are small; no uploads on this API.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn v1_routes() -> Router<AppState> {
    Router::new()
        // Availability check
        .route(
            "/schedules/check-and-suggest",
            post(handlers::check_schedule),
        )
        // Class CRUD and lifecycle
        .route(
            "/courseclasses",
            get(handlers::list_classes).post(handlers::create_class),
        )
        .route(
            "/courseclasses/schedule-by-week",
            get(handlers::weekly_schedule),
        )
        .route(
            "/courseclasses/{id}",
            get(handlers::get_class).put(handlers::update_class),
        )
        .route(
            "/courseclasses/{id}/status",
            post(handlers::change_class_status),
        )
        // Reference catalog
        .route("/rooms", get(handlers::list_rooms))
        .route("/lecturers", get(handlers::list_lecturers))
        .route("/courses", get(handlers::list_courses))
}
