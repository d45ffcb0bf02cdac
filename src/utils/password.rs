use std::sync::Arc;

use campussync_core::{AppError, SecretVerifier};

/// Hashes `secret` with the configured scheme on the blocking pool.
pub async fn hash_secret(
    secrets: &Arc<dyn SecretVerifier>,
    secret: &str,
) -> Result<String, AppError> {
    let secrets = Arc::clone(secrets);
    let secret = secret.to_string();

    tokio::task::spawn_blocking(move || secrets.hash(&secret))
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}
