//! Short code allocation: credential check, collision-free code search, durable
//! insert, and cache priming.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::credential_gate::CredentialGate;
use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, CacheService};
use crate::utils::code_generator::{CodeGenerator, is_reserved};

/// How many times a lost insert race restarts the allocation with a fresh candidate.
const MAX_INSERT_RACES: usize = 1;

/// Bound on the candidate search.
///
/// Unbounded by default: the loop only ends when the store reports a free
/// code. As the keyspace fills up a cap turns a potential livelock into an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationPolicy {
    pub max_attempts: Option<usize>,
}

impl AllocationPolicy {
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    pub fn bounded(max_attempts: usize) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }
}

/// Outcome of the write-through step after a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    Primed,
    /// The mapping is durable but the cache could not be primed. Reads will
    /// fall back to the store and repair the cache.
    Failed(CacheError),
}

/// A successfully allocated mapping.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub mapping: Mapping,
    pub cache: CacheWrite,
}

impl Allocation {
    pub fn code(&self) -> &str {
        &self.mapping.code
    }
}

/// Allocates globally unique short codes.
///
/// The existence check is a fast path to avoid wasted inserts; the store's
/// unique constraint is what actually settles a race between two writers that
/// drew the same candidate.
pub struct AllocationService {
    mappings: Arc<dyn MappingRepository>,
    cache: Arc<dyn CacheService>,
    gate: Arc<dyn CredentialGate>,
    generator: Arc<dyn CodeGenerator>,
    policy: AllocationPolicy,
    cache_ttl: Duration,
}

impl AllocationService {
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        gate: Arc<dyn CredentialGate>,
        generator: Arc<dyn CodeGenerator>,
        policy: AllocationPolicy,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            mappings,
            cache,
            gate,
            generator,
            policy,
            cache_ttl,
        }
    }

    /// Checks the bearer token, then allocates.
    ///
    /// The gate is consulted before anything touches the store or the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is missing or rejected,
    /// otherwise see [`Self::allocate`].
    pub async fn allocate_authorized(
        &self,
        token: Option<&str>,
        long_url: String,
        owner: Option<String>,
    ) -> Result<Allocation, AppError> {
        self.authorize(token).await?;
        self.allocate(long_url, owner).await
    }

    /// Asks the credential gate about `token`. A missing token is rejected
    /// without consulting the gate.
    pub async fn authorize(&self, token: Option<&str>) -> Result<(), AppError> {
        let authorized = match token {
            Some(token) => self.gate.is_authorized(token).await,
            None => false,
        };

        if !authorized {
            return Err(AppError::unauthorized(
                "User is not logged in",
                json!({ "reason": "Bearer token is missing, invalid, or expired" }),
            ));
        }

        Ok(())
    }

    /// Allocates a fresh code for `long_url` and persists the mapping.
    ///
    /// `long_url` is stored as given; it is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store fails during the
    /// search or the insert; no mapping is written in that case.
    /// Returns [`AppError::Internal`] if the policy's attempt cap is reached or
    /// the insert keeps losing races.
    pub async fn allocate(
        &self,
        long_url: String,
        owner: Option<String>,
    ) -> Result<Allocation, AppError> {
        let mut races = 0;

        let mapping = loop {
            let code = self.find_free_code().await?;

            let new_mapping = NewMapping {
                code,
                long_url: long_url.clone(),
                owner: owner.clone(),
            };

            match self.mappings.insert(new_mapping).await {
                Ok(mapping) => break mapping,
                Err(StoreError::CodeCollision { code }) if races < MAX_INSERT_RACES => {
                    races += 1;
                    metrics::counter!("allocation_insert_collisions_total").increment(1);
                    warn!("Insert lost race for code {}, retrying with a new candidate", code);
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(code = %mapping.code, "Allocated short code");

        let cache = match self
            .cache
            .set_url(&mapping.code, &mapping.long_url, self.cache_ttl)
            .await
        {
            Ok(()) => CacheWrite::Primed,
            Err(e) => {
                metrics::counter!("cache_write_failures_total").increment(1);
                warn!(code = %mapping.code, "Mapping stored but cache priming failed: {}", e);
                CacheWrite::Failed(e)
            }
        };

        Ok(Allocation { mapping, cache })
    }

    /// Draws candidates until the store reports one as unused.
    async fn find_free_code(&self) -> Result<String, AppError> {
        let mut attempts = 0usize;

        loop {
            if let Some(max) = self.policy.max_attempts {
                if attempts >= max {
                    return Err(AppError::internal(
                        "Failed to generate unique code",
                        json!({ "reason": "Too many collisions", "attempts": attempts }),
                    ));
                }
            }
            attempts += 1;

            let candidate = self.generator.generate();

            if is_reserved(&candidate) {
                debug!("Skipping reserved candidate {}", candidate);
                continue;
            }

            if !self.mappings.exists_by_code(&candidate).await? {
                return Ok(candidate);
            }

            metrics::counter!("allocation_candidates_rejected_total").increment(1);
            debug!("Candidate {} already taken", candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential_gate::MockCredentialGate;
    use crate::domain::repositories::MockMappingRepository;
    use crate::infrastructure::cache::{MemoryCache, MockCacheService};
    use crate::infrastructure::persistence::InMemoryMappingRepository;
    use crate::utils::code_generator::{RandomCodeGenerator, is_well_formed};
    use chrono::Utc;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(86_400);

    /// Hands out a fixed sequence of candidates, then panics.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CodeGenerator for ScriptedGenerator {
        fn generate(&self) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.codes
                .lock()
                .unwrap()
                .pop_front()
                .expect("generator script exhausted")
        }
    }

    fn allowing_gate() -> Arc<MockCredentialGate> {
        let mut gate = MockCredentialGate::new();
        gate.expect_is_authorized().returning(|_| true);
        Arc::new(gate)
    }

    fn stored(new_mapping: NewMapping) -> Mapping {
        Mapping::new(
            1,
            new_mapping.code,
            new_mapping.long_url,
            new_mapping.owner,
            Utc::now(),
        )
    }

    fn service(
        mappings: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        gate: Arc<dyn CredentialGate>,
        generator: Arc<dyn CodeGenerator>,
        policy: AllocationPolicy,
    ) -> AllocationService {
        AllocationService::new(mappings, cache, gate, generator, policy, TTL)
    }

    #[tokio::test]
    async fn test_allocate_success_primes_cache() {
        let mut repo = MockMappingRepository::new();
        let mut cache = MockCacheService::new();

        repo.expect_exists_by_code()
            .withf(|code| code == "aB3xY9")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|m| {
                m.code == "aB3xY9"
                    && m.long_url == "https://example.com/a"
                    && m.owner.as_deref() == Some("u1")
            })
            .times(1)
            .returning(|m| Ok(stored(m)));
        cache
            .expect_set_url()
            .withf(|code, url, ttl| code == "aB3xY9" && url == "https://example.com/a" && *ttl == TTL)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let generator = Arc::new(ScriptedGenerator::new(&["aB3xY9"]));
        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            allowing_gate(),
            generator,
            AllocationPolicy::unbounded(),
        );

        let allocation = service
            .allocate("https://example.com/a".to_string(), Some("u1".to_string()))
            .await
            .unwrap();

        assert_eq!(allocation.code(), "aB3xY9");
        assert_eq!(allocation.cache, CacheWrite::Primed);
    }

    #[tokio::test]
    async fn test_allocate_skips_preseeded_codes() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        for code in ["taken1", "taken2", "taken3"] {
            repo.insert(NewMapping {
                code: code.to_string(),
                long_url: "https://seeded.example".to_string(),
                owner: None,
            })
            .await
            .unwrap();
        }
        let cache = Arc::new(MemoryCache::new());
        let generator = Arc::new(ScriptedGenerator::new(&[
            "taken1", "taken2", "taken3", "free01",
        ]));

        let service = service(
            repo.clone(),
            cache.clone(),
            allowing_gate(),
            generator.clone(),
            AllocationPolicy::unbounded(),
        );

        let allocation = service
            .allocate("https://example.com/new".to_string(), None)
            .await
            .unwrap();

        assert_eq!(allocation.code(), "free01");
        assert_eq!(generator.calls(), 4);
        assert_eq!(repo.count().await.unwrap(), 4);
        assert_eq!(
            cache.get_url("free01").await.unwrap().as_deref(),
            Some("https://example.com/new")
        );
        let seeded = repo.find_by_code("taken1").await.unwrap().unwrap();
        assert_eq!(seeded.long_url, "https://seeded.example");
    }

    #[tokio::test]
    async fn test_allocate_bounded_policy_gives_up() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists_by_code().times(3).returning(|_| Ok(true));
        repo.expect_insert().times(0);
        let mut cache = MockCacheService::new();
        cache.expect_set_url().times(0);

        let generator = Arc::new(ScriptedGenerator::new(&["aaaaa1", "aaaaa2", "aaaaa3"]));
        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            allowing_gate(),
            generator.clone(),
            AllocationPolicy::bounded(3),
        );

        let err = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_allocate_store_unavailable_during_check_aborts() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists_by_code()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".into())));
        repo.expect_insert().times(0);
        let mut cache = MockCacheService::new();
        cache.expect_set_url().times(0);

        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            allowing_gate(),
            Arc::new(ScriptedGenerator::new(&["aB3xY9"])),
            AllocationPolicy::unbounded(),
        );

        let err = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_allocate_store_unavailable_during_insert_skips_cache() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists_by_code().returning(|_| Ok(false));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("timeout".into())));
        let mut cache = MockCacheService::new();
        cache.expect_set_url().times(0);

        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            allowing_gate(),
            Arc::new(ScriptedGenerator::new(&["aB3xY9"])),
            AllocationPolicy::unbounded(),
        );

        let err = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_allocate_retries_once_after_lost_insert_race() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists_by_code().times(2).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|m| m.code == "raced1")
            .times(1)
            .returning(|m| Err(StoreError::CodeCollision { code: m.code }));
        repo.expect_insert()
            .withf(|m| m.code == "fresh1")
            .times(1)
            .returning(|m| Ok(stored(m)));
        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .withf(|code, _, _| code == "fresh1")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            allowing_gate(),
            Arc::new(ScriptedGenerator::new(&["raced1", "fresh1"])),
            AllocationPolicy::unbounded(),
        );

        let allocation = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(allocation.code(), "fresh1");
    }

    #[tokio::test]
    async fn test_allocate_second_lost_race_is_fatal() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists_by_code().times(2).returning(|_| Ok(false));
        repo.expect_insert()
            .times(2)
            .returning(|m| Err(StoreError::CodeCollision { code: m.code }));
        let mut cache = MockCacheService::new();
        cache.expect_set_url().times(0);

        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            allowing_gate(),
            Arc::new(ScriptedGenerator::new(&["raced1", "raced2"])),
            AllocationPolicy::unbounded(),
        );

        let err = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_allocate_cache_failure_is_not_fatal() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .times(1)
            .returning(|_, _, _| Err(CacheError::ConnectionError("refused".into())));

        let service = service(
            repo.clone(),
            Arc::new(cache),
            allowing_gate(),
            Arc::new(ScriptedGenerator::new(&["aB3xY9"])),
            AllocationPolicy::unbounded(),
        );

        let allocation = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert!(matches!(allocation.cache, CacheWrite::Failed(_)));
        assert!(repo.exists_by_code("aB3xY9").await.unwrap());
    }

    #[tokio::test]
    async fn test_allocate_never_hands_out_reserved_codes() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let generator = Arc::new(ScriptedGenerator::new(&["health", "aB3xY9"]));

        let service = service(
            repo,
            Arc::new(MemoryCache::new()),
            allowing_gate(),
            generator.clone(),
            AllocationPolicy::unbounded(),
        );

        let allocation = service
            .allocate("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(allocation.code(), "aB3xY9");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_allocate_accepts_empty_url_as_is() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let service = service(
            repo.clone(),
            Arc::new(MemoryCache::new()),
            allowing_gate(),
            Arc::new(RandomCodeGenerator),
            AllocationPolicy::unbounded(),
        );

        let allocation = service.allocate(String::new(), None).await.unwrap();

        let stored = repo.find_by_code(allocation.code()).await.unwrap().unwrap();
        assert_eq!(stored.long_url, "");
    }

    #[tokio::test]
    async fn test_allocate_authorized_rejects_before_side_effects() {
        let mut gate = MockCredentialGate::new();
        gate.expect_is_authorized()
            .withf(|t| t == "bad-token")
            .times(1)
            .returning(|_| false);
        let mut repo = MockMappingRepository::new();
        repo.expect_exists_by_code().times(0);
        repo.expect_insert().times(0);
        let mut cache = MockCacheService::new();
        cache.expect_set_url().times(0);
        let generator = Arc::new(ScriptedGenerator::new(&[]));

        let service = service(
            Arc::new(repo),
            Arc::new(cache),
            Arc::new(gate),
            generator.clone(),
            AllocationPolicy::unbounded(),
        );

        let err = service
            .allocate_authorized(Some("bad-token"), "https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_allocate_authorized_missing_token_skips_gate() {
        let mut gate = MockCredentialGate::new();
        gate.expect_is_authorized().times(0);

        let service = service(
            Arc::new(MockMappingRepository::new()),
            Arc::new(MockCacheService::new()),
            Arc::new(gate),
            Arc::new(ScriptedGenerator::new(&[])),
            AllocationPolicy::unbounded(),
        );

        let err = service
            .allocate_authorized(None, "https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_yield_distinct_codes() {
        const N: usize = 200;
        let repo = Arc::new(InMemoryMappingRepository::new());
        let cache = Arc::new(MemoryCache::new());
        let service = Arc::new(service(
            repo.clone(),
            cache.clone(),
            allowing_gate(),
            Arc::new(RandomCodeGenerator),
            AllocationPolicy::unbounded(),
        ));

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .allocate(format!("https://example.com/{i}"), None)
                        .await
                        .map(|a| a.mapping)
                })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            let mapping = handle.await.unwrap().unwrap();
            assert!(is_well_formed(&mapping.code));
            // Coherence: whatever the cache holds equals the durable value.
            let cached = cache.get_url(&mapping.code).await.unwrap();
            assert_eq!(cached.as_deref(), Some(mapping.long_url.as_str()));
            codes.insert(mapping.code);
        }

        assert_eq!(codes.len(), N);
        assert_eq!(repo.count().await.unwrap(), N as i64);
    }
}
