//! Schedule conflict detection and suggestion engine.
//!
//! The engine is deterministic and side-effect free: it reads a snapshot
//! of the booking index plus the reference catalog and never touches
//! storage itself. The repository layer owns the index and decides when
//! results may be committed.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  expansion: pattern × date range → dated sessions        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  index: booked slots per (room, date) / (lecturer, date) │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  conflict: collect every colliding occurrence            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  suggest: ranked conflict-free alternatives              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod conflict;
pub mod expansion;
pub mod index;
pub mod policy;
pub mod suggest;

pub use conflict::{detect_conflicts, has_conflict, ConflictReason, SessionConflict};
pub use expansion::{end_date_for_sessions, expand_sessions, session_span};
pub use index::{BookedSlot, BookingIndex};
pub use policy::SuggestPolicy;
pub use suggest::{suggest_alternatives, SuggestionCandidate, SuggestionChange};
