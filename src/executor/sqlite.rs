//! SQLite-backed executor.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::{debug, info};

use super::{ColumnInfo, QueryExecutionError, QueryExecutor, Schema, SchemaProvider, TableSchema};
use crate::builder::Relationship;
use crate::sql::{Dialect, SqlDialect};
use crate::table::{ResultTable, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Executes queries against a SQLite database file.
#[derive(Debug)]
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QueryExecutionError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| QueryExecutionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Opened SQLite database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, QueryExecutionError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Run statements that return no rows (DDL, inserts).
    pub fn execute_batch(&self, sql: &str) -> Result<(), QueryExecutionError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn quote(name: &str) -> String {
        Dialect::Sqlite.quote_identifier(name)
    }

    fn table_names(&self) -> Result<Vec<String>, QueryExecutionError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, sql: &str) -> Result<ResultTable, QueryExecutionError> {
        let mut stmt = self.conn.prepare(sql)?;

        let columns: Vec<(String, Option<String>)> = stmt
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.decl_type().map(str::to_uppercase)))
            .collect();

        let mut rows = stmt.query([])?;
        let mut data = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for (idx, (_, decl)) in columns.iter().enumerate() {
                cells.push(convert(row.get_ref(idx)?, decl.as_deref()));
            }
            data.push(cells);
        }

        debug!(rows = data.len(), columns = columns.len(), "Query executed");

        let names = columns.into_iter().map(|(name, _)| name).collect();
        Ok(ResultTable::new(names, data)?)
    }
}

impl SchemaProvider for SqliteExecutor {
    fn schema(&self) -> Result<Schema, QueryExecutionError> {
        let mut schema = Schema::new();

        for table in self.table_names()? {
            let mut stmt = self
                .conn
                .prepare(&format!("PRAGMA table_info({})", Self::quote(&table)))?;
            let columns = stmt
                .query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get(1)?,
                        data_type: row.get(2)?,
                        nullable: row.get::<_, i64>(3)? == 0,
                        is_primary_key: row.get::<_, i64>(5)? > 0,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let row_count: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", Self::quote(&table)),
                [],
                |row| row.get(0),
            )?;

            schema.insert(
                table,
                TableSchema {
                    columns,
                    row_count: row_count.max(0) as u64,
                },
            );
        }

        Ok(schema)
    }

    fn relationships(&self) -> Result<Vec<Relationship>, QueryExecutionError> {
        let mut relationships = Vec::new();

        for table in self.table_names()? {
            let mut stmt = self
                .conn
                .prepare(&format!("PRAGMA foreign_key_list({})", Self::quote(&table)))?;
            let found = stmt
                .query_map([], |row| {
                    let to_table: String = row.get(2)?;
                    let from_column: String = row.get(3)?;
                    // `to` is NULL when the key references the parent's primary key
                    let to_column: Option<String> = row.get(4)?;
                    Ok((to_table, from_column, to_column))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (to_table, from_column, to_column) in found {
                let to_column = to_column.unwrap_or_else(|| "id".to_string());
                relationships.push(Relationship::new(&table, &from_column, &to_table, &to_column));
            }
        }

        Ok(relationships)
    }
}

fn convert(value: ValueRef<'_>, decl: Option<&str>) -> Value {
    let is_temporal = decl.is_some_and(|d| d.contains("DATE") || d.contains("TIME"));
    let is_bool = decl.is_some_and(|d| d.contains("BOOL"));

    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) if is_bool => Value::Bool(n != 0),
        ValueRef::Integer(n) => Value::Int(n),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if is_temporal {
                if let Some(dt) = parse_datetime(&text) {
                    return Value::DateTime(dt);
                }
            }
            Value::Text(text.into_owned())
        }
        ValueRef::Blob(bytes) => Value::Text(format!("<{} bytes>", bytes.len())),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
