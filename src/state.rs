use std::sync::Arc;

use anyhow::Context;
use campussync_auth::{
    CredentialVerifier, InMemorySessionStore, PgCredentialStore, SessionStore,
};
use campussync_cache::{RedisCache, RedisSessionStore};
use campussync_config::{
    CorsConfig, DatabaseConfig, RateLimitConfig, SecretConfig, SecretScheme, SessionBackend,
    SessionConfig, StorageConfig,
};
use campussync_core::{
    BcryptSecrets, FileStorage, LocalFileStorage, PlaintextSecrets, SecretVerifier,
};
use campussync_db::{ConnectionSource, PgConnectionSource, init_db_pool};
use sqlx::PgPool;

/// Everything a handler needs, cheap to clone per request.
///
/// Reads go straight to `db`. Writes go through `tx_source`, which hands out
/// one exclusive connection per transaction context.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tx_source: Arc<dyn ConnectionSource>,
    pub verifier: CredentialVerifier,
    pub sessions: Arc<dyn SessionStore>,
    pub secrets: Arc<dyn SecretVerifier>,
    pub storage: Arc<dyn FileStorage>,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool(&DatabaseConfig::from_env())
        .await
        .context("Failed to connect to database")?;

    let secrets = init_secrets(&SecretConfig::from_env())?;
    let sessions = init_session_store(&SessionConfig::from_env()).await?;

    let storage_config = StorageConfig::from_env();
    let storage = LocalFileStorage::with_max_size(
        storage_config.upload_dir,
        storage_config.base_url,
        storage_config.max_bytes,
    );

    Ok(AppState {
        tx_source: Arc::new(PgConnectionSource::new(db.clone())),
        verifier: CredentialVerifier::new(
            Arc::new(PgCredentialStore::new(db.clone())),
            Arc::clone(&secrets),
        ),
        db,
        sessions,
        secrets,
        storage: Arc::new(storage),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    })
}

pub fn init_secrets(config: &SecretConfig) -> anyhow::Result<Arc<dyn SecretVerifier>> {
    Ok(match config.scheme {
        SecretScheme::Bcrypt => Arc::new(
            BcryptSecrets::new(config.bcrypt_cost).context("Invalid BCRYPT_COST")?,
        ),
        SecretScheme::Plaintext => {
            tracing::warn!("SECRET_SCHEME=plaintext: secrets are stored unhashed");
            Arc::new(PlaintextSecrets)
        }
    })
}

pub async fn init_session_store(config: &SessionConfig) -> anyhow::Result<Arc<dyn SessionStore>> {
    match config.backend {
        SessionBackend::Memory => Ok(Arc::new(InMemorySessionStore::new(config.ttl))),
        SessionBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("SESSION_STORE=redis requires REDIS_URL")?;
            let cache = RedisCache::new(url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Sessions stored in Redis");
            Ok(Arc::new(RedisSessionStore::new(cache, config.ttl)))
        }
    }
}
