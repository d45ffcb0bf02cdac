use std::sync::Arc;

use campussync_core::{CoreError, WriteError};
use campussync_db::{PgConnectionSource, TransactionContext, WriteUnit};
use sqlx::PgPool;

/// Inserts one admin account. `password_hash` is stored as given.
pub async fn create_admin(
    db: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let unit = WriteUnit::single(
        "admin",
        &["username", "password"],
        vec![username.into(), password_hash.into()],
    );

    match TransactionContext::apply(Arc::new(PgConnectionSource::new(db.clone())), &[unit]).await {
        Ok(_) => Ok(()),
        Err(CoreError::Write(WriteError::ConstraintViolation(_))) => {
            Err(format!("Admin '{}' already exists", username).into())
        }
        Err(e) => Err(e.into()),
    }
}
