//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every lookup is a miss, so every resolution falls back to the durable store.
/// Used when caching is disabled or when Redis is unreachable at startup.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_url(&self, _short_code: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(&self, _short_code: &str, _long_url: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn refresh_ttl(&self, _short_code: &str, _ttl: Duration) -> CacheResult<bool> {
        Ok(false)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        cache
            .set_url("aB3xY9", "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get_url("aB3xY9").await.unwrap(), None);
        assert!(!cache.refresh_ttl("aB3xY9", Duration::from_secs(60)).await.unwrap());
        assert!(cache.health_check().await);
    }
}
