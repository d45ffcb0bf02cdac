//! # CampusSync DB
//!
//! Database access for the CampusSync API.
//!
//! - [`init_db_pool`]: the shared PostgreSQL pool used by read paths
//! - [`connection`]: the object-safe seam a [`TransactionContext`] acquires
//!   its exclusive connection through
//! - [`transaction`]: the begin/commit/rollback/close coordinator that every
//!   write path runs under
//! - [`write_unit`]: uniform multi-row inserts applied inside a context
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use campussync_db::{PgConnectionSource, TransactionContext, WriteUnit};
//!
//! let source = Arc::new(PgConnectionSource::new(pool.clone()));
//! let mut ctx = TransactionContext::new(source);
//! ctx.begin().await?;
//! let outcome = ctx.execute(&unit).await.map(|n| n == 1);
//! ctx.settle(outcome).await?;
//! ```

pub mod connection;
pub mod transaction;
pub mod write_unit;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use campussync_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use connection::{ConnectionSource, PgConnectionSource, TxConnection, classify};
pub use transaction::{TransactionContext, TxState};
pub use write_unit::{SqlParam, WriteUnit};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemorySource;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Builds the shared PostgreSQL pool.
///
/// The acquire timeout bounds how long a request waits for a connection; a
/// timeout surfaces as a connectivity failure rather than a hung request.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}
