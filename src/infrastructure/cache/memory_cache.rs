//! In-process cache with per-entry expiry.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    long_url: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Cache backed by a sharded concurrent map.
///
/// Expired entries are dropped lazily on access. Time is read from
/// `tokio::time::Instant`, so tests can drive expiry with a paused clock.
/// Only coherent within a single process; use [`super::RedisCache`] when
/// several instances serve the same store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops an entry as if it had expired.
    pub fn evict(&self, short_code: &str) {
        self.entries.remove(short_code);
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        let Some(entry) = self.entries.get(short_code) else {
            return Ok(None);
        };

        if entry.is_expired(now) {
            drop(entry);
            self.entries
                .remove_if(short_code, |_, e| e.is_expired(Instant::now()));
            return Ok(None);
        }

        Ok(Some(entry.long_url.clone()))
    }

    async fn set_url(&self, short_code: &str, long_url: &str, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            short_code.to_owned(),
            Entry {
                long_url: long_url.to_owned(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn refresh_ttl(&self, short_code: &str, ttl: Duration) -> CacheResult<bool> {
        let now = Instant::now();

        match self.entries.get_mut(short_code) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expires_at = now + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
