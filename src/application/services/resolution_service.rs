//! Code resolution: cache first, store on miss, cache repair after a miss.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::is_well_formed;

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub long_url: String,
    pub source: ResolutionSource,
}

/// Resolves short codes to their long URLs.
///
/// Cache entries slide: every hit pushes the expiry out by the full TTL, so
/// a code read more often than once per TTL is never looked up in the store.
pub struct ResolutionService {
    mappings: Arc<dyn MappingRepository>,
    cache: Arc<dyn CacheService>,
    cache_ttl: Duration,
}

impl ResolutionService {
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            mappings,
            cache,
            cache_ttl,
        }
    }

    /// Resolves `code` to its long URL.
    ///
    /// Cache failures degrade to a store lookup and are never surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or was never
    /// allocated. Returns [`AppError::StoreUnavailable`] if the cache missed
    /// and the store could not be reached.
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        if !is_well_formed(code) {
            metrics::counter!("resolution_not_found_total").increment(1);
            return Err(not_found(code));
        }

        match self.cache.get_url(code).await {
            Ok(Some(long_url)) => {
                metrics::counter!("resolution_cache_hits_total").increment(1);
                self.slide_expiry(code).await;
                return Ok(Resolution {
                    long_url,
                    source: ResolutionSource::Cache,
                });
            }
            Ok(None) => {
                metrics::counter!("resolution_cache_misses_total").increment(1);
            }
            Err(e) => {
                metrics::counter!("resolution_cache_misses_total").increment(1);
                warn!(code, "Cache read failed, falling back to store: {}", e);
            }
        }

        let Some(mapping) = self.mappings.find_by_code(code).await? else {
            metrics::counter!("resolution_not_found_total").increment(1);
            return Err(not_found(code));
        };

        // Mappings are immutable, so concurrent repairs all write the same value.
        if let Err(e) = self
            .cache
            .set_url(code, &mapping.long_url, self.cache_ttl)
            .await
        {
            metrics::counter!("cache_write_failures_total").increment(1);
            warn!(code, "Cache repair failed: {}", e);
        }

        Ok(Resolution {
            long_url: mapping.long_url,
            source: ResolutionSource::Store,
        })
    }

    async fn slide_expiry(&self, code: &str) {
        match self.cache.refresh_ttl(code, self.cache_ttl).await {
            Ok(true) => {}
            Ok(false) => debug!(code, "Entry expired between read and refresh"),
            Err(e) => warn!(code, "Failed to refresh cache TTL: {}", e),
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "code": code }))
}
