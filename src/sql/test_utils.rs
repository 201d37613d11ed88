//! Parse-checks generated SQL with sqlparser.

use sqlparser::dialect::{dialect_from_str, Dialect as ParserDialect, MsSqlDialect};
use sqlparser::parser::Parser;

use super::dialect::{Dialect, SqlDialect};

/// Parse `sql` with the sqlparser dialect matching `dialect` and return the
/// number of statements.
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<usize, String> {
    // sqlparser knows T-SQL as "mssql"
    let parser_dialect: Box<dyn ParserDialect> = match dialect {
        Dialect::TSql => Box::new(MsSqlDialect {}),
        other => dialect_from_str(other.name())
            .ok_or_else(|| format!("sqlparser has no dialect named {}", other.name()))?,
    };

    Parser::parse_sql(parser_dialect.as_ref(), sql)
        .map(|statements| statements.len())
        .map_err(|e| format!("{} rejected generated SQL: {}\n{}", dialect, e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_dialect_has_a_parser() {
        for dialect in [
            Dialect::Generic,
            Dialect::Postgres,
            Dialect::DuckDb,
            Dialect::MySql,
            Dialect::TSql,
            Dialect::Sqlite,
        ] {
            assert_eq!(validate_sql("SELECT zone FROM readings", dialect), Ok(1));
        }
    }

    #[test]
    fn test_rejects_misspelled_keywords() {
        let err = validate_sql("SELEC zone FORM readings", Dialect::Postgres).unwrap_err();
        assert!(err.starts_with("postgres rejected generated SQL"));
    }
}
