//! The contract between checks and a time-series backend.

use std::future::Future;

use serde_json::Value;

use crate::{AdapterError, QueryRequest};

static NULL: Value = Value::Null;

/// A backend that can answer [`QueryRequest`]s.
///
/// Implementations perform exactly one round-trip per call and carry no state
/// between calls that would make a query observe an earlier one.
pub trait QueryBackend {
    /// Run the query and return its result set.
    ///
    /// `Ok(QueryResponse::NoSeries)` means the query succeeded but matched
    /// nothing; errors are reserved for failing to get an answer at all.
    fn query(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<QueryResponse, AdapterError>>;
}

/// Result of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// The backend returned no series for the measurement.
    NoSeries,
    /// Rows matched by the query.
    Table(Table),
}

impl QueryResponse {
    pub fn table(&self) -> Option<&Table> {
        match self {
            QueryResponse::NoSeries => None,
            QueryResponse::Table(table) => Some(table),
        }
    }

    pub fn row_count(&self) -> usize {
        self.table().map_or(0, |t| t.rows.len())
    }
}

/// A tabular result: column names and positional rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Series (measurement) name.
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Position of `column`, if it was returned.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Values of `column` in row order, or `None` if the column is absent.
    ///
    /// Short rows yield `Value::Null` for the missing cell.
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let index = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(index).unwrap_or(&NULL)),
        )
    }
}
