//! Axum REST API over the scheduler.
//!
//! Exposes the availability check, the suggestion search, the class
//! lifecycle and the weekly timetable. Handlers translate between the
//! admin front end's wire contract (`dto`) and the service layer in
//! `db::services`; nothing in here touches a repository directly.
//!
//! ```text
//! dto/handlers (wire contract, status mapping)
//!      -> db::services (logging, business rules)
//!           -> repository traits (storage)
//! ```

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
