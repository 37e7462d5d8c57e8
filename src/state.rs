//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AllocationService, ResolutionService};
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::cache::CacheService;

/// Services and collaborators shared across requests.
///
/// Everything is behind an `Arc`, so cloning per request is cheap. The
/// store and cache handles are the same instances the services hold; the
/// health check uses them directly.
#[derive(Clone)]
pub struct AppState {
    pub allocation_service: Arc<AllocationService>,
    pub resolution_service: Arc<ResolutionService>,
    pub mappings: Arc<dyn MappingRepository>,
    pub cache: Arc<dyn CacheService>,
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        allocation_service: Arc<AllocationService>,
        resolution_service: Arc<ResolutionService>,
        mappings: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        base_url: &str,
    ) -> Self {
        Self {
            allocation_service,
            resolution_service,
            mappings,
            cache,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Public URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
