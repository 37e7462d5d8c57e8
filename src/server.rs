//! HTTP server initialization and runtime setup.
//!
//! Builds every long-lived collaborator once (database pool, cache connection,
//! credential gate client), injects them into the services, and runs Axum
//! until a shutdown signal arrives.

use crate::application::services::{
    AccountService, AllocationPolicy, AllocationService, ResolutionService,
};
use crate::config::{CacheBackend, Config};
use crate::domain::credential_gate::CredentialGate;
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::auth::{JwtIssuer, LocalCredentialGate, RemoteCredentialGate};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgMappingRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Timeout for a single call to an external credential service.
const GATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, the
/// credential gate cannot be built, or the listener cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let mappings: Arc<dyn MappingRepository> = Arc::new(PgMappingRepository::new(pool.clone()));

    let cache = build_cache(&config).await;

    let issuer = config
        .jwt_secret
        .as_deref()
        .map(|secret| Arc::new(JwtIssuer::new(secret, config.jwt_ttl_seconds)));

    let gate = build_gate(&config, issuer.clone())?;

    let accounts = issuer.map(|issuer| {
        Arc::new(AccountService::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            issuer,
        ))
    });

    let ttl = Duration::from_secs(config.cache_ttl_seconds);

    let allocation_service = Arc::new(AllocationService::new(
        mappings.clone(),
        cache.clone(),
        gate,
        Arc::new(RandomCodeGenerator),
        AllocationPolicy {
            max_attempts: config.max_allocation_attempts,
        },
        ttl,
    ));
    let resolution_service = Arc::new(ResolutionService::new(mappings.clone(), cache.clone(), ttl));

    let state = AppState::new(
        allocation_service,
        resolution_service,
        mappings,
        cache,
        &config.base_url,
    );

    let app = app_router(state, accounts);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Picks the cache implementation. An unreachable Redis degrades to
/// [`NullCache`]: every read goes to the store, but the service stays up.
async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        (CacheBackend::Memory, _) => {
            tracing::info!("Cache enabled (in-process)");
            Arc::new(MemoryCache::new())
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Prefers the external credential service; falls back to verifying JWTs
/// locally with the shared secret.
fn build_gate(
    config: &Config,
    issuer: Option<Arc<JwtIssuer>>,
) -> Result<Arc<dyn CredentialGate>> {
    if let Some(url) = &config.auth_service_url {
        let gate = RemoteCredentialGate::new(url, GATE_TIMEOUT)
            .context("Failed to build credential service client")?;
        tracing::info!("Credential gate: remote ({})", url);
        return Ok(Arc::new(gate));
    }

    match issuer {
        Some(issuer) => {
            tracing::info!("Credential gate: local JWT");
            Ok(Arc::new(LocalCredentialGate::new(issuer)))
        }
        None => anyhow::bail!("No credential gate configured"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
