//! Helpers shared by the read paths of every module.

use campussync_core::AppError;

/// Maps a failed read. A query the database rejected is a server bug; a
/// database that cannot be reached is an outage. Neither is an empty result.
pub fn read_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(e) => {
            tracing::error!(error = %e, "Read query rejected");
            AppError::internal(anyhow::anyhow!("Failed to load records"))
        }
        e => {
            tracing::warn!(error = %e, "Database unreachable during read");
            AppError::unavailable("Database unavailable")
        }
    }
}
