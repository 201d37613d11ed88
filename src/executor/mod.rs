//! Query execution and schema lookup.
//!
//! The builder, chart and report engines never touch a database. Callers
//! run SQL through a [`QueryExecutor`] and hand the resulting
//! [`ResultTable`] on. [`SqliteExecutor`] is the bundled implementation.

mod sqlite;

pub use sqlite::SqliteExecutor;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::builder::Relationship;
use crate::table::{ResultTable, TableError};

/// Failure running SQL. Driver messages are passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum QueryExecutionError {
    #[error("Database error: {0}")]
    Driver(#[from] rusqlite::Error),

    #[error("Failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Malformed result: {0}")]
    Table(#[from] TableError),
}

/// One column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnInfo>,
    pub row_count: u64,
}

/// Table name to schema, sorted by name.
pub type Schema = BTreeMap<String, TableSchema>;

/// Runs SQL and returns rows.
pub trait QueryExecutor {
    fn execute(&self, sql: &str) -> Result<ResultTable, QueryExecutionError>;
}

/// Describes the tables a selection can draw from.
pub trait SchemaProvider {
    fn schema(&self) -> Result<Schema, QueryExecutionError>;

    /// Declared foreign keys. Sources without them report none.
    fn relationships(&self) -> Result<Vec<Relationship>, QueryExecutionError> {
        Ok(Vec::new())
    }
}
