//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache implementation for fast URL lookups.
///
/// Holds one `ConnectionManager`, created at startup and cloned per call; the
/// manager reconnects on its own after a dropped connection. Keys are the bare
/// short codes.
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

/// Redis rejects a zero expiry, so sub-second TTLs round up to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(short_code)
            .await
            .map_err(|e| {
                warn!("Redis GET error for {}: {}", short_code, e);
                CacheError::OperationError(e.to_string())
            })?;

        match &value {
            Some(_) => debug!("Cache HIT: {}", short_code),
            None => debug!("Cache MISS: {}", short_code),
        }

        Ok(value)
    }

    async fn set_url(&self, short_code: &str, long_url: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let seconds = ttl_seconds(ttl);

        conn.set_ex::<_, _, ()>(short_code, long_url, seconds)
            .await
            .map_err(|e| {
                warn!("Redis SET error for {}: {}", short_code, e);
                CacheError::OperationError(e.to_string())
            })?;

        debug!("Cache SET: {} -> {} (TTL: {}s)", short_code, long_url, seconds);
        Ok(())
    }

    async fn refresh_ttl(&self, short_code: &str, ttl: Duration) -> CacheResult<bool> {
        let mut conn = self.client.clone();
        let seconds = ttl_seconds(ttl) as i64;

        let refreshed = conn
            .expire::<_, bool>(short_code, seconds)
            .await
            .map_err(|e| {
                warn!("Redis EXPIRE error for {}: {}", short_code, e);
                CacheError::OperationError(e.to_string())
            })?;

        debug!("Cache EXPIRE: {} (TTL: {}s, existed: {})", short_code, seconds, refreshed);
        Ok(refreshed)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
