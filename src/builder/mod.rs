//! Visual query builder.
//!
//! Turns a [`Selection`] of tables, columns, aggregations and filters into a
//! SELECT statement:
//!
//! ```
//! use sqlreport::builder::{build, Aggregate, Selection};
//!
//! let selection = Selection::new()
//!     .table("readings")
//!     .column("readings.zone")
//!     .column("readings.usage_gallons")
//!     .group_by("readings.zone")
//!     .aggregate("readings.usage_gallons", Aggregate::Sum);
//!
//! let sql = build(&selection).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT readings.zone,\n    SUM(readings.usage_gallons) AS sum_usage_gallons\n\
//!      FROM readings\nGROUP BY readings.zone"
//! );
//! ```
//!
//! # Security
//!
//! Filter values are spliced into the WHERE clause as text. Quoted values
//! have embedded single quotes doubled; text compared with `<`, `>`, `<=` or
//! `>=` is inserted verbatim. This is open to SQL injection and must be
//! replaced with bound parameters before the builder sees untrusted input.

mod explain;
mod joins;
mod selection;

pub use explain::{explain_sql, format_sql};
pub use joins::{join_condition, Relationship};
pub use selection::{Aggregate, Filter, FilterOp, FilterValue, Selection};

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::sql::expr::{col, column_path, func, lit_bool, lit_float, lit_int, raw_sql, Expr, ExprExt};
use crate::sql::query::{OrderByExpr, Query, SelectExpr, TableRef};
use crate::sql::Dialect;

// =============================================================================
// Errors
// =============================================================================

/// A selection that cannot be turned into SQL.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("At least one table must be selected")]
    NoTables,

    #[error("At least one column must be selected")]
    NoColumns,

    #[error("Column {0} is both grouped and aggregated")]
    GroupedAndAggregated(String),

    #[error("Column {0} is selected more than once")]
    DuplicateColumn(String),

    #[error("Filter on {0} has a non-finite number")]
    NonFiniteValue(String),
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// =============================================================================
// Validation
// =============================================================================

/// Check table and column choices before building.
///
/// Empty tables or columns are errors. A qualified column whose table is not
/// selected is only a warning.
pub fn validate<S: AsRef<str>>(tables: &[S], columns: &[S]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if tables.is_empty() {
        report.errors.push(ValidationError::NoTables.to_string());
    }
    if columns.is_empty() {
        report.errors.push(ValidationError::NoColumns.to_string());
    }

    for column in columns {
        let column = column.as_ref();
        if let Some((table_name, _)) = column.split_once('.') {
            if !tables.iter().any(|t| t.as_ref() == table_name) {
                report.warnings.push(format!(
                    "Column {} references table {} which is not selected",
                    column, table_name
                ));
            }
        }
    }

    report.is_valid = report.errors.is_empty();
    report
}

fn check(selection: &Selection) -> Result<(), ValidationError> {
    if selection.tables.is_empty() {
        return Err(ValidationError::NoTables);
    }
    if selection.columns.is_empty() {
        return Err(ValidationError::NoColumns);
    }

    let mut seen = HashSet::new();
    for column in &selection.columns {
        if !seen.insert(column.as_str()) {
            return Err(ValidationError::DuplicateColumn(column.clone()));
        }
    }

    if let Some(column) = selection
        .group_by
        .iter()
        .find(|c| selection.aggregations.contains_key(c.as_str()))
    {
        return Err(ValidationError::GroupedAndAggregated(column.clone()));
    }

    Ok(())
}

// =============================================================================
// Builder
// =============================================================================

/// Builds SQL from selections for one dialect and set of known relationships.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    dialect: Dialect,
    relationships: Vec<Relationship>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Declared relationships take precedence over name-based join guessing.
    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Build the query AST for a selection.
    pub fn to_query(&self, selection: &Selection) -> Result<Query, ValidationError> {
        check(selection)?;

        let select: Vec<SelectExpr> = selection
            .columns
            .iter()
            .map(|column| match selection.aggregation(column) {
                Some(agg) => func(agg.function_name(), vec![column_path(column)])
                    .alias(&agg.alias_for(column)),
                None => SelectExpr::new(column_path(column)),
            })
            .collect();

        let anchor = &selection.tables[0];
        let mut query = Query::new().select(select).from(TableRef::new(anchor));

        for table in &selection.tables[1..] {
            let on = join_condition(anchor, table, &self.relationships);
            query = query.join(TableRef::new(table), on);
        }

        for filter in &selection.filters {
            if let (true, Some(value)) = (filter.is_active(), &filter.value) {
                query = query.filter(filter_condition(filter, value)?);
            }
        }

        if !selection.group_by.is_empty() {
            query = query.group_by(selection.group_by.iter().map(|c| column_path(c)).collect());
        }

        if !selection.order_by.is_empty() {
            let order_by = selection
                .order_by
                .iter()
                .map(|item| match selection.aggregation(item) {
                    Some(agg) => OrderByExpr::desc(col(&agg.alias_for(item))),
                    None => OrderByExpr::asc(column_path(item)),
                })
                .collect();
            query = query.order_by(order_by);
        }

        Ok(query)
    }

    /// Build SQL text for a selection.
    pub fn build(&self, selection: &Selection) -> Result<String, ValidationError> {
        let query = self.to_query(selection)?;
        let sql = query.to_sql(self.dialect);

        info!(
            dialect = %self.dialect,
            tables = selection.tables.len(),
            columns = selection.columns.len(),
            "Built query"
        );
        debug!(%sql, "Generated SQL");

        Ok(sql)
    }
}

fn filter_condition(filter: &Filter, value: &FilterValue) -> Result<Expr, ValidationError> {
    let operand = match value {
        FilterValue::Text(text) if filter.operator.quotes_text() => Expr::from(text.as_str()),
        FilterValue::Text(text) => raw_sql(text),
        FilterValue::Int(n) => lit_int(*n),
        FilterValue::Float(f) if f.is_finite() => lit_float(*f),
        FilterValue::Float(_) => return Err(ValidationError::NonFiniteValue(filter.column.clone())),
        FilterValue::Bool(b) => lit_bool(*b),
    };

    Ok(column_path(&filter.column).binary(filter.operator.to_binary_operator(), operand))
}

/// Build SQL with the generic dialect and name-based joins.
///
/// See the module docs for the injection caveat on filter values.
pub fn build(selection: &Selection) -> Result<String, ValidationError> {
    QueryBuilder::new().build(selection)
}

/// Build SQL for a specific dialect.
pub fn build_for_dialect(selection: &Selection, dialect: Dialect) -> Result<String, ValidationError> {
    QueryBuilder::new().with_dialect(dialect).build(selection)
}
