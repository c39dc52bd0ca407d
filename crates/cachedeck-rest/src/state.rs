//! Application state for Axum handlers.

use cachedeck_service::CacheQueryService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache_service: Arc<dyn CacheQueryService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(cache_service: Arc<dyn CacheQueryService>) -> Self {
        Self { cache_service }
    }
}
