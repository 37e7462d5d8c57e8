//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
///
/// Either variant means the cache is unavailable for this call. Callers treat
/// it as a degraded state, never as a request failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching short code mappings.
///
/// Keys are bare short codes and values are long URLs. The cache is a
/// disposable shadow of the durable store: losing it costs latency, never
/// correctness.
///
/// Unlike a fail-open cache, implementations report transport failures as
/// [`CacheError`] so that callers can tell a miss from an outage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the long URL for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss (absent or expired)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend cannot be reached.
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping with the given expiry, replacing any previous entry.
    async fn set_url(&self, short_code: &str, long_url: &str, ttl: Duration) -> CacheResult<()>;

    /// Resets the expiry of an existing entry.
    ///
    /// Returns `Ok(false)` if the entry no longer exists.
    async fn refresh_ttl(&self, short_code: &str, ttl: Duration) -> CacheResult<bool>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
