//! # LSM Rust Backend
//!
//! Schedule conflict and suggestion engine for a language-school manager.
//!
//! This crate provides the Rust backend behind the LSM admin front end.
//! Given a recurring weekly schedule for a class (weekday pattern, start
//! time, session duration, date range, room, lecturer) it detects every
//! collision with existing room and lecturer bookings and, when something
//! collides, proposes ranked conflict-free alternatives. The backend
//! exposes a REST API via Axum for the React frontend.
//!
//! ## Features
//!
//! - **Session Expansion**: Materialize a recurring schedule into dated sessions
//! - **Conflict Detection**: Interval-overlap checks against a per-resource booking index
//! - **Suggestions**: Ranked conflict-free alternatives over time, pattern, room and lecturer
//! - **Class Lifecycle**: Create/update/status changes with commit-time race defense
//! - **Weekly Timetable**: Monday-to-Sunday view bucketed by daypart
//! - **HTTP API**: REST endpoints consumed by the admin UI
//!
//! ## Architecture
//!
//! Modules, from the outside in:
//!
//! - [`api`]: Identifier newtypes and the re-exported DTO surface
//! - [`models`]: Domain types: weekday patterns, time spans, classes, catalog
//! - [`engine`]: Expansion, booking index, conflict detection, suggestion search
//! - [`db`]: Repository traits, in-memory store, and the service layer
//! - [`http`]: Axum router, handlers and wire DTOs
//!

// RepositoryError carries conflict and suggestion payloads inline.
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod engine;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
