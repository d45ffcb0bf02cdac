//! Explicit transaction lifecycle for multi-statement write paths.
//!
//! ```text
//! Idle --begin--> Active --commit--> Committed --close--> Closed
//!                   |                                  ^
//!                   +--rollback--> RolledBack --close--+
//! ```
//!
//! A [`TransactionContext`] owns at most one connection, acquired at
//! `begin` and given back exactly once at `close`. `Closed` is terminal.
//! Any write failure inside an active context rolls the transaction back
//! before the error is returned, so a caller that sees an error knows no
//! part of the unit is visible.

use std::fmt;
use std::sync::Arc;

use campussync_core::{CoreError, TransactionError, WriteError};
use tracing::instrument;

use crate::connection::{ConnectionSource, TxConnection};
use crate::write_unit::WriteUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Active,
    Committed,
    RolledBack,
    Closed,
}

impl TxState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct TransactionContext {
    source: Arc<dyn ConnectionSource>,
    conn: Option<Box<dyn TxConnection>>,
    state: TxState,
    /// Set when a COMMIT or ROLLBACK failed and the server-side state of the
    /// connection is unknown.
    poisoned: bool,
}

impl fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionContext")
            .field("state", &self.state)
            .field("holds_connection", &self.conn.is_some())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

impl TransactionContext {
    pub fn new(source: Arc<dyn ConnectionSource>) -> Self {
        Self {
            source,
            conn: None,
            state: TxState::Idle,
            poisoned: false,
        }
    }

    /// Applies `units` in order under one transaction and commits them
    /// together, returning the rows written. Any failure leaves none of them
    /// visible.
    pub async fn apply(
        source: Arc<dyn ConnectionSource>,
        units: &[WriteUnit],
    ) -> Result<u64, CoreError> {
        let mut ctx = Self::new(source);
        ctx.begin().await?;

        let mut written = 0;
        let mut outcome = Ok(true);
        for unit in units {
            match ctx.execute(unit).await {
                Ok(n) => written += n,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        ctx.settle(outcome).await.map(|_| written)
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TxState::Active
    }

    /// Acquires a connection and opens a transaction on it.
    #[instrument(skip(self), fields(tx_state = %self.state))]
    pub async fn begin(&mut self) -> Result<(), CoreError> {
        match self.state {
            TxState::Closed => return Err(TransactionError::InactiveTransaction.into()),
            TxState::Active | TxState::Committed | TxState::RolledBack => {
                return Err(TransactionError::AlreadyActive.into());
            }
            TxState::Idle => {}
        }

        let mut conn = self.source.acquire().await?;
        if let Err(e) = conn.begin().await {
            tracing::warn!(error = %e, "BEGIN failed; discarding connection");
            conn.discard();
            return Err(e.into());
        }

        self.conn = Some(conn);
        self.state = TxState::Active;
        tracing::debug!("Transaction begun");
        Ok(())
    }

    /// Applies `unit` on the context's connection.
    ///
    /// On failure the transaction is rolled back before the error is
    /// returned and the context moves to `RolledBack`.
    #[instrument(skip(self, unit), fields(table = unit.table(), rows = unit.len()))]
    pub async fn execute(&mut self, unit: &WriteUnit) -> Result<u64, CoreError> {
        self.require_active()?;
        let conn = self.conn.as_mut().ok_or(TransactionError::NotActive)?;

        match conn.execute(unit).await {
            Ok(written) => Ok(written),
            Err(e) => {
                tracing::warn!(error = %e, "Write failed; rolling back");
                self.rollback_active().await;
                Err(e.into())
            }
        }
    }

    /// Makes every write since `begin` durable.
    ///
    /// If COMMIT fails the context still attempts a ROLLBACK, ends in
    /// `RolledBack`, and returns the commit error.
    #[instrument(skip(self))]
    pub async fn commit(&mut self) -> Result<(), CoreError> {
        self.require_active()?;
        let conn = self.conn.as_mut().ok_or(TransactionError::NotActive)?;

        match conn.commit().await {
            Ok(()) => {
                self.state = TxState::Committed;
                metrics::counter!("campussync_transactions_total", "outcome" => "committed")
                    .increment(1);
                tracing::debug!("Transaction committed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "COMMIT failed; rolling back");
                self.rollback_active().await;
                Err(e.into())
            }
        }
    }

    /// Discards every write since `begin`. A no-op unless the context is
    /// `Active`.
    #[instrument(skip(self), fields(tx_state = %self.state))]
    pub async fn rollback(&mut self) -> Result<(), CoreError> {
        match self.state {
            TxState::Closed => Err(TransactionError::InactiveTransaction.into()),
            TxState::Active => match self.rollback_active().await {
                Some(e) => Err(e.into()),
                None => Ok(()),
            },
            TxState::Idle | TxState::Committed | TxState::RolledBack => Ok(()),
        }
    }

    /// Ends the context and gives its connection back exactly once.
    ///
    /// Idempotent. An `Active` transaction is rolled back first.
    #[instrument(skip(self), fields(tx_state = %self.state))]
    pub async fn close(&mut self) {
        if self.state == TxState::Closed {
            return;
        }
        if self.state == TxState::Active {
            self.rollback_active().await;
        }

        if let Some(conn) = self.conn.take() {
            if self.poisoned {
                conn.discard();
            } else {
                conn.release();
            }
        }
        self.state = TxState::Closed;
    }

    /// Finishes an orchestrated write: commit on `Ok(true)`, roll back on
    /// `Ok(false)` or an error, and close in every case.
    pub async fn settle(mut self, outcome: Result<bool, CoreError>) -> Result<bool, CoreError> {
        let result = match outcome {
            Ok(true) => self.commit().await.map(|_| true),
            Ok(false) => self.rollback().await.map(|_| false),
            Err(e) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback after failed operation also failed");
                }
                Err(e)
            }
        };

        self.close().await;
        result
    }

    fn require_active(&self) -> Result<(), TransactionError> {
        match self.state {
            TxState::Active => Ok(()),
            TxState::Closed => Err(TransactionError::InactiveTransaction),
            _ => Err(TransactionError::NotActive),
        }
    }

    /// Rolls back an `Active` transaction, always leaving the context in
    /// `RolledBack`. Returns the rollback error, if any.
    async fn rollback_active(&mut self) -> Option<WriteError> {
        let failure = match self.conn.as_mut() {
            Some(conn) => conn.rollback().await.err(),
            None => None,
        };

        if let Some(e) = &failure {
            tracing::error!(error = %e, "ROLLBACK failed; connection will be discarded");
            self.poisoned = true;
        }

        self.state = TxState::RolledBack;
        metrics::counter!("campussync_transactions_total", "outcome" => "rolled_back")
            .increment(1);
        failure
    }
}

impl Drop for TransactionContext {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!(
                tx_state = %self.state,
                "Transaction context dropped without close; discarding connection"
            );
            conn.discard();
        }
    }
}
