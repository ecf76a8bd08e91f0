//! Shared state threaded through the router.

use std::sync::Arc;

use crate::db::repository::FullRepository;

/// State handed to every handler.
///
/// The repository sits behind an `Arc` so the CPU-heavy handlers can
/// clone a handle into the blocking tasks they spawn.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }
}
