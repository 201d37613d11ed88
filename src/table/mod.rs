//! Result tables - the in-memory rows a query returns.
//!
//! Column order and row order are kept exactly as the query produced them.
//! Each column gets an inferred [`ColumnType`] from its non-null cells.

pub mod stats;
mod value;

pub use value::{GroupKey, Value};

use std::fmt;

use serde::Serialize;

/// Error building a table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Inferred column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    DateTime,
    Boolean,
}

impl ColumnType {
    /// Infer a type from a column's cells, ignoring nulls.
    ///
    /// A column with no non-null cells, or with mixed kinds, is categorical.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
        let mut inferred: Option<ColumnType> = None;

        for value in values {
            let kind = match value {
                Value::Null => continue,
                Value::Int(_) | Value::Float(_) => ColumnType::Numeric,
                Value::Bool(_) => ColumnType::Boolean,
                Value::DateTime(_) => ColumnType::DateTime,
                Value::Text(_) => return ColumnType::Categorical,
            };
            match inferred {
                None => inferred = Some(kind),
                Some(prev) if prev == kind => {}
                Some(_) => return ColumnType::Categorical,
            }
        }

        inferred.unwrap_or(ColumnType::Categorical)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
            ColumnType::DateTime => "datetime",
            ColumnType::Boolean => "boolean",
        })
    }
}

/// Column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Rows returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl ResultTable {
    /// Build a table and infer column types.
    pub fn new(names: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let expected = names.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(TableError::RaggedRow {
                row,
                expected,
                found,
            });
        }

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Column {
                column_type: ColumnType::infer(rows.iter().map(|r| &r[idx])),
                name,
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// A table with columns but no rows.
    pub fn empty(names: Vec<String>) -> Self {
        let columns = names
            .into_iter()
            .map(|name| Column {
                name,
                column_type: ColumnType::Categorical,
            })
            .collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// No rows. A table with columns but zero rows is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_type(&self, idx: usize) -> ColumnType {
        self.columns[idx].column_type
    }

    pub fn column_name(&self, idx: usize) -> &str {
        &self.columns[idx].name
    }

    /// Cells of one column, in row order.
    pub fn values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |r| &r[idx])
    }

    /// Non-null numeric cells of one column, in row order.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.values(idx).filter_map(Value::as_f64).collect()
    }

    fn indices_of(&self, column_type: ColumnType) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.column_type == column_type)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn numeric_columns(&self) -> Vec<usize> {
        self.indices_of(ColumnType::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<usize> {
        self.indices_of(ColumnType::Categorical)
    }

    pub fn datetime_columns(&self) -> Vec<usize> {
        self.indices_of(ColumnType::DateTime)
    }

    pub fn null_count(&self, idx: usize) -> usize {
        self.values(idx).filter(|v| v.is_null()).count()
    }

    pub fn total_nulls(&self) -> usize {
        (0..self.column_count()).map(|i| self.null_count(i)).sum()
    }

    pub fn cell_count(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// Row indices ordered by one column. Stable; nulls last.
    pub fn sorted_indices(&self, idx: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.row_count()).collect();
        order.sort_by(|&a, &b| self.rows[a][idx].sort_cmp(&self.rows[b][idx]));
        order
    }

    /// The first `n` rows as a new table. Column types are kept.
    pub fn head(&self, n: usize) -> ResultTable {
        ResultTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
