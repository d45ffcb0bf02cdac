//! Uniform multi-row inserts.

use chrono::NaiveDate;

/// Postgres caps a single statement at this many bind parameters.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// A positional parameter of a [`WriteUnit`] row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlParam {
    Int(i32),
    Text(String),
    NullableText(Option<String>),
    Date(NaiveDate),
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Option<String>> for SqlParam {
    fn from(v: Option<String>) -> Self {
        Self::NullableText(v)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

/// Rows of identical shape destined for one table.
///
/// Table and column names are `'static` so they can only come from code,
/// never from a request.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteUnit {
    table: &'static str,
    columns: &'static [&'static str],
    rows: Vec<Vec<SqlParam>>,
    conflict_target: Option<&'static [&'static str]>,
}

impl WriteUnit {
    pub fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            rows: Vec::new(),
            conflict_target: None,
        }
    }

    /// Rows that collide with an existing row on `target` are skipped
    /// instead of failing the statement. Skipped rows do not count as
    /// written.
    pub fn skip_conflicts_on(mut self, target: &'static [&'static str]) -> Self {
        self.conflict_target = Some(target);
        self
    }

    pub fn conflict_target(&self) -> Option<&'static [&'static str]> {
        self.conflict_target
    }

    /// A unit holding exactly one row.
    pub fn single(
        table: &'static str,
        columns: &'static [&'static str],
        row: Vec<SqlParam>,
    ) -> Self {
        let mut unit = Self::new(table, columns);
        unit.push(row);
        unit
    }

    pub fn push(&mut self, row: Vec<SqlParam>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width must match columns");
        self.rows.push(row);
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<SqlParam>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Splits into units of at most `max_rows` rows, preserving order.
    pub fn split(self, max_rows: usize) -> Vec<WriteUnit> {
        let max_rows = max_rows.max(1);
        let (table, columns, conflict_target) = (self.table, self.columns, self.conflict_target);
        let mut rows = self.rows.into_iter().peekable();
        let mut units = Vec::new();

        while rows.peek().is_some() {
            units.push(WriteUnit {
                table,
                columns,
                rows: rows.by_ref().take(max_rows).collect(),
                conflict_target,
            });
        }
        units
    }

    /// Most rows one statement can carry for this column count.
    pub fn max_rows_per_statement(&self) -> usize {
        (MAX_BIND_PARAMS / self.columns.len().max(1)).max(1)
    }

    /// `INSERT INTO table (a, b) VALUES ($1, $2), ($3, $4)` for the given
    /// number of rows.
    pub fn insert_sql(&self, row_count: usize) -> String {
        let width = self.columns.len();
        let mut query = format!(
            "INSERT INTO {} ({}) VALUES ",
            self.table,
            self.columns.join(", ")
        );

        for row in 0..row_count {
            if row > 0 {
                query.push_str(", ");
            }
            query.push('(');
            for col in 0..width {
                if col > 0 {
                    query.push_str(", ");
                }
                query.push_str(&format!("${}", row * width + col + 1));
            }
            query.push(')');
        }

        if let Some(target) = self.conflict_target {
            query.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", target.join(", ")));
        }
        query
    }
}
