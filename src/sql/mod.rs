//! SQL generation module.
//!
//! A type-safe SQL builder that generates multi-dialect SELECT statements.
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use expr::{
    col, column_path, func, lit_bool, lit_float, lit_int, lit_str, raw_sql, table_col,
    BinaryOperator, Expr, ExprExt, Literal,
};
pub use query::{Join, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
pub use token::{Keyword, Token, TokenStream};
