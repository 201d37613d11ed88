//! Query builder - construct SELECT statements with a fluent API.
//!
//! Layout is fixed: one clause per line, SELECT items after the first on
//! their own line indented four spaces.
//!
//! ```text
//! SELECT readings.zone,
//!     SUM(readings.usage) AS sum_usage
//! FROM readings
//! JOIN meters ON readings.id = meters.id
//! WHERE readings.zone = 'North'
//! GROUP BY readings.zone
//! ORDER BY sum_usage DESC
//! ```

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Keyword, TokenStream};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.expr.to_tokens();
        if let Some(alias) = &self.alias {
            ts.space().keyword(Keyword::As).space().ident(alias);
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub table: String,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.ident(&self.table);
        ts
    }
}

// =============================================================================
// Joins
// =============================================================================

/// An inner JOIN clause, written as a bare `JOIN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.keyword(Keyword::Join)
            .space()
            .append(&self.table.to_tokens())
            .space()
            .keyword(Keyword::On)
            .space()
            .append(&self.on.to_tokens());
        ts
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Desc,
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.expr.to_tokens();
        ts.space().keyword(match self.dir {
            SortDir::Asc => Keyword::Asc,
            SortDir::Desc => Keyword::Desc,
        });
        ts
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add a JOIN.
    pub fn join(mut self, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join { table, on });
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Lower to tokens in the fixed one-clause-per-line layout.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.keyword(Keyword::Select);
        for (i, item) in self.select.iter().enumerate() {
            if i == 0 {
                ts.space();
            } else {
                ts.comma().newline().indent();
            }
            ts.append(&item.to_tokens());
        }

        if let Some(from) = &self.from {
            ts.newline().keyword(Keyword::From).space().append(&from.to_tokens());
        }

        for join in &self.joins {
            ts.newline().append(&join.to_tokens());
        }

        if let Some(condition) = &self.where_clause {
            ts.newline().keyword(Keyword::Where).space().append(&condition.to_tokens());
        }

        if !self.group_by.is_empty() {
            ts.newline()
                .keyword(Keyword::GroupBy)
                .space()
                .comma_separated(self.group_by.iter().map(Expr::to_tokens));
        }

        if !self.order_by.is_empty() {
            ts.newline()
                .keyword(Keyword::OrderBy)
                .space()
                .comma_separated(self.order_by.iter().map(OrderByExpr::to_tokens));
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Formats the query using the default (generic) dialect.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(Dialect::default()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::expr::{col, func, lit_str, table_col};
    use crate::sql::test_utils::validate_sql;
    use insta::assert_snapshot;

    #[test]
    fn test_single_column() {
        let query = Query::new()
            .select(vec![col("zone")])
            .from(TableRef::new("readings"));

        assert_eq!(query.to_sql(Dialect::Generic), "SELECT zone\nFROM readings");
    }

    #[test]
    fn test_select_items_break_lines() {
        let query = Query::new()
            .select(vec![
                SelectExpr::new(table_col("r", "zone")),
                func("SUM", vec![table_col("r", "usage")]).alias("sum_usage"),
            ])
            .from(TableRef::new("r"));

        assert_snapshot!(query.to_sql(Dialect::Generic), @r"
        SELECT r.zone,
            SUM(r.usage) AS sum_usage
        FROM r
        ");
    }

    #[test]
    fn test_full_query_postgres() {
        let query = Query::new()
            .select(vec![
                SelectExpr::new(table_col("orders", "region")),
                func("SUM", vec![table_col("orders", "amount")]).alias("sum_amount"),
            ])
            .from(TableRef::new("orders"))
            .join(
                TableRef::new("customers"),
                table_col("orders", "id").eq(table_col("customers", "id")),
            )
            .filter(table_col("orders", "region").eq(lit_str("West")))
            .group_by(vec![table_col("orders", "region")])
            .order_by(vec![OrderByExpr::desc(col("sum_amount"))]);

        let sql = query.to_sql(Dialect::Postgres);
        assert_snapshot!(sql, @r#"
        SELECT "orders"."region",
            SUM("orders"."amount") AS "sum_amount"
        FROM "orders"
        JOIN "customers" ON "orders"."id" = "customers"."id"
        WHERE "orders"."region" = 'West'
        GROUP BY "orders"."region"
        ORDER BY "sum_amount" DESC
        "#);
        validate_sql(&sql, Dialect::Postgres).unwrap();
    }

    #[test]
    fn test_filters_are_anded() {
        let query = Query::new()
            .select(vec![col("a")])
            .from(TableRef::new("t"))
            .filter(col("a").eq(1_i64))
            .filter(col("b").gt(2_i64))
            .filter(col("c").like("x%"));

        let sql = query.to_sql(Dialect::Generic);
        assert!(sql.ends_with("WHERE a = 1 AND b > 2 AND c LIKE 'x%'"));
        validate_sql(&sql, Dialect::Generic).unwrap();
    }

    #[test]
    fn test_display_uses_generic() {
        let query = Query::new()
            .select(vec![col("a")])
            .from(TableRef::new("t"))
            .order_by(vec![OrderByExpr::asc(col("a"))]);

        assert_eq!(query.to_string(), "SELECT a\nFROM t\nORDER BY a ASC");
    }

    #[test]
    fn test_tsql_and_mysql_validate() {
        let query = Query::new()
            .select(vec![table_col("t", "a")])
            .from(TableRef::new("t"))
            .filter(table_col("t", "a").eq(true));

        for dialect in [Dialect::TSql, Dialect::MySql, Dialect::Sqlite, Dialect::DuckDb] {
            validate_sql(&query.to_sql(dialect), dialect).unwrap();
        }
    }
}
