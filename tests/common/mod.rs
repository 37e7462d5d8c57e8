#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use snaplink::api::handlers::{health_handler, redirect_handler};
use snaplink::api::routes::{account_routes, shorten_routes};
use snaplink::application::services::{
    AccountService, AllocationPolicy, AllocationService, ResolutionService,
};
use snaplink::domain::credential_gate::CredentialGate;
use snaplink::infrastructure::auth::{JwtIssuer, LocalCredentialGate};
use snaplink::infrastructure::cache::{CacheError, CacheResult, CacheService, MemoryCache};
use snaplink::infrastructure::persistence::{InMemoryMappingRepository, InMemoryUserRepository};
use snaplink::state::AppState;
use snaplink::utils::code_generator::RandomCodeGenerator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const BASE_URL: &str = "http://sn.test";
pub const STRONG_PASSWORD: &str = "Str0ng!pass";
pub const TTL: Duration = Duration::from_secs(86_400);

/// In-process cache that can be switched into an outage.
#[derive(Default)]
pub struct SwitchableCache {
    inner: MemoryCache,
    down: AtomicBool,
}

impl SwitchableCache {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryCache {
        &self.inner
    }

    fn check(&self) -> CacheResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("cache offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for SwitchableCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        self.check()?;
        self.inner.get_url(short_code).await
    }

    async fn set_url(&self, short_code: &str, long_url: &str, ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.inner.set_url(short_code, long_url, ttl).await
    }

    async fn refresh_ttl(&self, short_code: &str, ttl: Duration) -> CacheResult<bool> {
        self.check()?;
        self.inner.refresh_ttl(short_code, ttl).await
    }

    async fn health_check(&self) -> bool {
        !self.down.load(Ordering::SeqCst)
    }
}

/// Fully wired services over in-memory collaborators.
pub struct TestContext {
    pub state: AppState,
    pub mappings: Arc<InMemoryMappingRepository>,
    pub cache: Arc<SwitchableCache>,
    pub accounts: Arc<AccountService>,
    pub issuer: Arc<JwtIssuer>,
}

impl TestContext {
    /// Writes are guarded by a local JWT gate.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Writes are guarded by `gate` instead of the local JWT gate.
    pub fn with_gate(gate: Arc<dyn CredentialGate>) -> Self {
        Self::build(Some(gate))
    }

    fn build(gate: Option<Arc<dyn CredentialGate>>) -> Self {
        let mappings = Arc::new(InMemoryMappingRepository::new());
        let cache = Arc::new(SwitchableCache::default());
        let issuer = Arc::new(JwtIssuer::new("integration-secret", 3600));

        let gate = gate.unwrap_or_else(|| Arc::new(LocalCredentialGate::new(issuer.clone())));

        let allocation_service = Arc::new(AllocationService::new(
            mappings.clone(),
            cache.clone(),
            gate,
            Arc::new(RandomCodeGenerator),
            AllocationPolicy::unbounded(),
            TTL,
        ));
        let resolution_service =
            Arc::new(ResolutionService::new(mappings.clone(), cache.clone(), TTL));
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            issuer.clone(),
        ));

        let state = AppState::new(
            allocation_service,
            resolution_service,
            mappings.clone(),
            cache.clone(),
            BASE_URL,
        );

        Self {
            state,
            mappings,
            cache,
            accounts,
            issuer,
        }
    }

    /// A valid bearer token for the local gate.
    pub fn token(&self) -> String {
        self.issuer.issue("alice", 1).unwrap()
    }

    /// All routes, without the outer path-normalization layer.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/{code}", get(redirect_handler))
            .merge(shorten_routes())
            .merge(account_routes(self.accounts.clone()))
            .with_state(self.state.clone())
    }
}
