//! The seam between a [`crate::TransactionContext`] and the store.
//!
//! A context never talks to a pool directly. It asks a [`ConnectionSource`]
//! for one exclusive [`TxConnection`], drives the transaction on it, and
//! hands it back with [`TxConnection::release`] when the transaction ended
//! cleanly or [`TxConnection::discard`] when its state is unknown.

use campussync_core::{BoxFuture, WriteError};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use crate::write_unit::{SqlParam, WriteUnit};

/// One exclusive connection, owned by a single context at a time.
pub trait TxConnection: Send {
    fn begin(&mut self) -> BoxFuture<'_, Result<(), WriteError>>;
    fn commit(&mut self) -> BoxFuture<'_, Result<(), WriteError>>;
    fn rollback(&mut self) -> BoxFuture<'_, Result<(), WriteError>>;

    /// Applies every row of `unit`, returning the number of rows written.
    fn execute<'a>(&'a mut self, unit: &'a WriteUnit) -> BoxFuture<'a, Result<u64, WriteError>>;

    /// Returns a connection with no open transaction to its source.
    fn release(self: Box<Self>);

    /// Drops a connection whose transaction state is unknown. It is never
    /// handed to another caller.
    fn discard(self: Box<Self>);
}

/// Hands out exclusive connections.
pub trait ConnectionSource: Send + Sync {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn TxConnection>, WriteError>>;
}

/// Maps a driver error onto the write taxonomy.
///
/// Anything the database itself reported (constraint, type or data errors)
/// means the store was reachable and refused the write. Everything else
/// (I/O, TLS, pool timeouts, protocol errors) is a connectivity failure.
pub fn classify(err: sqlx::Error) -> WriteError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let detail = db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db_err.message().to_string());
            WriteError::ConstraintViolation(detail)
        }
        _ => WriteError::ConnectivityFailure(err.to_string()),
    }
}

/// [`ConnectionSource`] backed by the shared sqlx pool.
#[derive(Clone, Debug)]
pub struct PgConnectionSource {
    pool: PgPool,
}

impl PgConnectionSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ConnectionSource for PgConnectionSource {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn TxConnection>, WriteError>> {
        Box::pin(async move {
            let conn = self.pool.acquire().await.map_err(classify)?;
            Ok(Box::new(PgTxConnection { conn }) as Box<dyn TxConnection>)
        })
    }
}

struct PgTxConnection {
    conn: PoolConnection<Postgres>,
}

impl PgTxConnection {
    async fn simple(&mut self, statement: &'static str) -> Result<(), WriteError> {
        sqlx::query(statement)
            .execute(&mut *self.conn)
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

impl TxConnection for PgTxConnection {
    fn begin(&mut self) -> BoxFuture<'_, Result<(), WriteError>> {
        Box::pin(self.simple("BEGIN"))
    }

    fn commit(&mut self) -> BoxFuture<'_, Result<(), WriteError>> {
        Box::pin(self.simple("COMMIT"))
    }

    fn rollback(&mut self) -> BoxFuture<'_, Result<(), WriteError>> {
        Box::pin(self.simple("ROLLBACK"))
    }

    fn execute<'a>(&'a mut self, unit: &'a WriteUnit) -> BoxFuture<'a, Result<u64, WriteError>> {
        Box::pin(async move {
            let mut written = 0;

            for rows in unit.rows().chunks(unit.max_rows_per_statement()) {
                let sql = unit.insert_sql(rows.len());
                let mut query = sqlx::query(&sql);

                for param in rows.iter().flatten() {
                    query = match param {
                        SqlParam::Int(v) => query.bind(*v),
                        SqlParam::Text(v) => query.bind(v.clone()),
                        SqlParam::NullableText(v) => query.bind(v.clone()),
                        SqlParam::Date(v) => query.bind(*v),
                    };
                }

                written += query
                    .execute(&mut *self.conn)
                    .await
                    .map_err(classify)?
                    .rows_affected();
            }

            Ok(written)
        })
    }

    fn release(self: Box<Self>) {
        drop(self);
    }

    fn discard(self: Box<Self>) {
        let raw = self.conn.detach();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    use sqlx::Connection;
                    if let Err(e) = raw.close().await {
                        tracing::debug!(error = %e, "Discarded connection did not close cleanly");
                    }
                });
            }
            Err(_) => drop(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connectivity_failures() {
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            WriteError::ConnectivityFailure(_)
        ));
        assert!(matches!(
            classify(sqlx::Error::PoolClosed),
            WriteError::ConnectivityFailure(_)
        ));
    }

    #[test]
    fn test_io_errors_are_connectivity_failures() {
        let err = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset by peer",
        ));
        assert!(matches!(classify(err), WriteError::ConnectivityFailure(_)));
    }
}
