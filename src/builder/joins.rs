//! Join condition inference.
//!
//! Every table after the first is joined to the anchor table. A declared
//! relationship between the two is used when one exists; otherwise the
//! condition is guessed from the table names:
//!
//! - both names contain `customer` -> `anchor.customer_id = t.customer_id`
//! - anything else -> `anchor.id = t.id`
//!
//! The name heuristic knows nothing about the real schema.

use serde::{Deserialize, Serialize};

use crate::sql::expr::{table_col, Expr, ExprExt};

/// A foreign-key style link between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

impl Relationship {
    pub fn new(from_table: &str, from_column: &str, to_table: &str, to_column: &str) -> Self {
        Self {
            from_table: from_table.to_string(),
            from_column: from_column.to_string(),
            to_table: to_table.to_string(),
            to_column: to_column.to_string(),
        }
    }

    /// Orient this relationship as `(anchor column, other column)` if it
    /// links the two tables in either direction.
    fn oriented(&self, anchor: &str, table: &str) -> Option<(&str, &str)> {
        if self.from_table == anchor && self.to_table == table {
            Some((&self.from_column, &self.to_column))
        } else if self.from_table == table && self.to_table == anchor {
            Some((&self.to_column, &self.from_column))
        } else {
            None
        }
    }
}

/// ON condition joining `table` to `anchor`.
pub fn join_condition(anchor: &str, table: &str, relationships: &[Relationship]) -> Expr {
    if let Some((anchor_col, table_col_name)) = relationships
        .iter()
        .find_map(|rel| rel.oriented(anchor, table))
    {
        return table_col(anchor, anchor_col).eq(table_col(table, table_col_name));
    }

    let key = heuristic_key(anchor, table);
    table_col(anchor, key).eq(table_col(table, key))
}

fn heuristic_key(anchor: &str, table: &str) -> &'static str {
    if anchor.contains("customer") && table.contains("customer") {
        "customer_id"
    } else {
        "id"
    }
}
