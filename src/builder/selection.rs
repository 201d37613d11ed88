//! Selection - the structured input to the query builder.
//!
//! A selection deserializes straight from the JSON the UI layer posts:
//!
//! ```json
//! {
//!   "tables": ["readings", "customers"],
//!   "columns": ["readings.zone", "readings.usage_gallons"],
//!   "group_by": ["readings.zone"],
//!   "aggregations": { "readings.usage_gallons": "SUM" },
//!   "filters": [{ "column": "readings.zone", "operator": "=", "value": "North" }],
//!   "order_by": ["readings.usage_gallons"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sql::expr::BinaryOperator;

// =============================================================================
// Aggregates
// =============================================================================

/// Aggregate functions offered by the visual builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregate {
    Sum,
    Count,
    Avg,
    Min,
    Max,
}

impl Aggregate {
    /// SQL function name.
    pub fn function_name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Count => "COUNT",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }

    /// Alias for an aggregated column: `sum_usage` for `SUM(readings.usage)`.
    pub fn alias_for(&self, column: &str) -> String {
        let bare = column.rsplit('.').next().unwrap_or(column);
        format!("{}_{}", self.function_name().to_lowercase(), bare)
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

impl FromStr for Aggregate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUM" => Ok(Aggregate::Sum),
            "COUNT" => Ok(Aggregate::Count),
            "AVG" => Ok(Aggregate::Avg),
            "MIN" => Ok(Aggregate::Min),
            "MAX" => Ok(Aggregate::Max),
            other => Err(format!("Unknown aggregate: {}", other)),
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Comparison operators available to filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterOp {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "LIKE", alias = "like")]
    Like,
}

impl FilterOp {
    /// Only equality and pattern operators get their text operand quoted.
    pub fn quotes_text(&self) -> bool {
        matches!(self, FilterOp::Eq | FilterOp::Ne | FilterOp::Like)
    }

    pub fn to_binary_operator(self) -> BinaryOperator {
        match self {
            FilterOp::Eq => BinaryOperator::Eq,
            FilterOp::Ne => BinaryOperator::Ne,
            FilterOp::Lt => BinaryOperator::Lt,
            FilterOp::Gt => BinaryOperator::Gt,
            FilterOp::Lte => BinaryOperator::Lte,
            FilterOp::Gte => BinaryOperator::Gte,
            FilterOp::Like => BinaryOperator::Like,
        }
    }
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "=" => Ok(FilterOp::Eq),
            "!=" | "<>" => Ok(FilterOp::Ne),
            "<" => Ok(FilterOp::Lt),
            ">" => Ok(FilterOp::Gt),
            "<=" => Ok(FilterOp::Lte),
            ">=" => Ok(FilterOp::Gte),
            "LIKE" => Ok(FilterOp::Like),
            other => Err(format!("Unknown filter operator: {}", other)),
        }
    }
}

/// A filter operand as typed in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Int(n)
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// A single WHERE condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    #[serde(default)]
    pub operator: FilterOp,
    /// A missing (null) value drops the filter at build time.
    #[serde(default)]
    pub value: Option<FilterValue>,
}

impl Filter {
    pub fn new(column: &str, operator: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: Some(value.into()),
        }
    }

    /// Whether this filter contributes a condition.
    pub fn is_active(&self) -> bool {
        !self.column.trim().is_empty() && self.value.is_some()
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The user's table/column choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// First table anchors the joins.
    pub tables: Vec<String>,
    /// Qualified `table.column` references, in display order.
    pub columns: Vec<String>,
    pub group_by: Vec<String>,
    pub aggregations: BTreeMap<String, Aggregate>,
    pub filters: Vec<Filter>,
    pub order_by: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str) -> Self {
        self.tables.push(name.to_string());
        self
    }

    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    pub fn aggregate(mut self, column: &str, aggregate: Aggregate) -> Self {
        self.aggregations.insert(column.to_string(), aggregate);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(column.to_string());
        self
    }

    /// Aggregate applied to `column`, if any.
    pub fn aggregation(&self, column: &str) -> Option<Aggregate> {
        self.aggregations.get(column).copied()
    }
}
