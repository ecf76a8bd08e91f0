//! Repository implementations module.
//!
//! This module contains implementations of the repository traits:
//! - `local`: In-memory implementation backing local deployments and tests
pub mod local;

pub use local::LocalRepository;
