//! SQL Dialect definitions and formatting rules.
//!
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: none (Generic), `"` (Postgres/DuckDB/SQLite),
//!   `` ` `` (MySQL), `[]` (T-SQL)
//! - Boolean literals: true/false vs 1/0
//! - Unicode string prefixes (T-SQL `N'...'`)
//!
//! The `Generic` dialect is the default. It writes identifiers exactly as the
//! user selected them, which is the form the visual builder has always shown.
//!
//! # Usage
//!
//! ```
//! use sqlreport::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! assert_eq!(dialect.quote_identifier("user"), "\"user\"");
//! ```

mod duckdb;
mod generic;
pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;
mod tsql;

pub use duckdb::DuckDb;
pub use generic::Generic;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use tsql::TSql;

use std::str::FromStr;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Generic,
    Postgres,
    DuckDb,
    MySql,
    TSql,
    Sqlite,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Generic => &Generic,
            Dialect::Postgres => &Postgres,
            Dialect::DuckDb => &DuckDb,
            Dialect::MySql => &MySql,
            Dialect::TSql => &TSql,
            Dialect::Sqlite => &Sqlite,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported dialect: {0}. Supported: generic, postgres, duckdb, mysql, tsql, sqlite")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "" => Ok(Dialect::Generic),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "duckdb" | "duck" => Ok(Dialect::DuckDb),
            "mysql" => Ok(Dialect::MySql),
            "tsql" | "mssql" | "sqlserver" => Ok(Dialect::TSql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}
