//! In-memory [`ConnectionSource`] for database-free tests.
//!
//! Rows written inside a transaction are staged on the connection and only
//! become visible through [`MemorySource::rows`] at commit. Foreign keys can
//! be emulated per column with [`MemorySource::with_reference`]: a statement
//! carrying any value outside the allowed set is rejected as a whole, the way
//! a multi-row INSERT is.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use campussync_core::{BoxFuture, WriteError};

use crate::connection::{ConnectionSource, TxConnection};
use crate::write_unit::{SqlParam, WriteUnit};

type Row = Vec<SqlParam>;

#[derive(Default)]
struct MemoryDb {
    tables: HashMap<&'static str, Vec<Row>>,
    references: HashMap<(&'static str, &'static str), HashSet<i32>>,
    fail_acquire: bool,
    fail_commit: bool,
    acquisitions: usize,
    releases: usize,
    discards: usize,
}

#[derive(Clone, Default)]
pub struct MemorySource {
    db: Arc<Mutex<MemoryDb>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `allowed` values may appear in `table.column`.
    pub fn with_reference(
        self,
        table: &'static str,
        column: &'static str,
        allowed: impl IntoIterator<Item = i32>,
    ) -> Self {
        self.lock()
            .references
            .insert((table, column), allowed.into_iter().collect());
        self
    }

    /// Every COMMIT fails with a connectivity failure.
    pub fn failing_commit(self) -> Self {
        self.lock().fail_commit = true;
        self
    }

    /// Every acquire fails with a connectivity failure.
    pub fn failing_acquire(self) -> Self {
        self.lock().fail_acquire = true;
        self
    }

    /// Committed rows of `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn acquisitions(&self) -> usize {
        self.lock().acquisitions
    }

    pub fn releases(&self) -> usize {
        self.lock().releases
    }

    pub fn discards(&self) -> usize {
        self.lock().discards
    }

    fn lock(&self) -> MutexGuard<'_, MemoryDb> {
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConnectionSource for MemorySource {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn TxConnection>, WriteError>> {
        Box::pin(async move {
            let mut db = self.lock();
            if db.fail_acquire {
                return Err(WriteError::ConnectivityFailure(
                    "connection refused".to_string(),
                ));
            }
            db.acquisitions += 1;
            Ok(Box::new(MemoryConnection {
                source: self.clone(),
                staged: Vec::new(),
            }) as Box<dyn TxConnection>)
        })
    }
}

struct MemoryConnection {
    source: MemorySource,
    staged: Vec<(&'static str, Row)>,
}

impl MemoryConnection {
    fn check_references(&self, unit: &WriteUnit) -> Result<(), WriteError> {
        let db = self.source.lock();

        for (index, column) in unit.columns().iter().enumerate() {
            let Some(allowed) = db.references.get(&(unit.table(), *column)) else {
                continue;
            };
            for row in unit.rows() {
                if let Some(SqlParam::Int(value)) = row.get(index) {
                    if !allowed.contains(value) {
                        return Err(WriteError::ConstraintViolation(format!(
                            "{}_{}_fkey",
                            unit.table(),
                            column
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl TxConnection for MemoryConnection {
    fn begin(&mut self) -> BoxFuture<'_, Result<(), WriteError>> {
        self.staged.clear();
        Box::pin(async { Ok(()) })
    }

    fn commit(&mut self) -> BoxFuture<'_, Result<(), WriteError>> {
        Box::pin(async move {
            let mut db = self.source.lock();
            if db.fail_commit {
                return Err(WriteError::ConnectivityFailure(
                    "connection lost during commit".to_string(),
                ));
            }
            for (table, row) in self.staged.drain(..) {
                db.tables.entry(table).or_default().push(row);
            }
            Ok(())
        })
    }

    fn rollback(&mut self) -> BoxFuture<'_, Result<(), WriteError>> {
        self.staged.clear();
        Box::pin(async { Ok(()) })
    }

    fn execute<'a>(&'a mut self, unit: &'a WriteUnit) -> BoxFuture<'a, Result<u64, WriteError>> {
        Box::pin(async move {
            self.check_references(unit)?;

            let Some(target) = unit.conflict_target() else {
                for row in unit.rows() {
                    self.staged.push((unit.table(), row.clone()));
                }
                return Ok(unit.len() as u64);
            };

            let key_columns: Vec<usize> = target
                .iter()
                .filter_map(|name| unit.columns().iter().position(|c| c == name))
                .collect();
            let key_of = |row: &Row| -> Vec<SqlParam> {
                key_columns.iter().filter_map(|i| row.get(*i).cloned()).collect()
            };

            let mut taken: HashSet<Vec<SqlParam>> = self
                .source
                .rows(unit.table())
                .iter()
                .chain(
                    self.staged
                        .iter()
                        .filter(|(table, _)| *table == unit.table())
                        .map(|(_, row)| row),
                )
                .map(key_of)
                .collect();

            let mut written = 0;
            for row in unit.rows() {
                if taken.insert(key_of(row)) {
                    self.staged.push((unit.table(), row.clone()));
                    written += 1;
                }
            }
            Ok(written)
        })
    }

    fn release(self: Box<Self>) {
        self.source.lock().releases += 1;
    }

    fn discard(self: Box<Self>) {
        self.source.lock().discards += 1;
    }
}
