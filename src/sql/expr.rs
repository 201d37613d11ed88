//! Expression tree for the WHERE, JOIN and SELECT parts of a query.
//!
//! Expressions lower to a dialect-free [`TokenStream`]; quoting happens
//! when the stream is serialized.

use super::token::{Token, TokenStream};

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `column` or `table.column`
    Column {
        table: Option<String>,
        column: String,
    },

    Literal(Literal),

    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// `NAME(arg, ...)`
    Function { name: String, args: Vec<Expr> },

    /// Emitted verbatim. Only the selection builder's unquoted comparison
    /// operands produce this; nothing here is sanitized.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
    And,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gte => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::And => "AND",
        }
    }
}

impl Literal {
    fn to_token(&self) -> Token {
        match self {
            Literal::Int(n) => Token::Int(*n),
            Literal::Float(f) => Token::Float(*f),
            Literal::String(s) => Token::Str(s.clone()),
            Literal::Bool(b) => Token::Bool(*b),
            Literal::Null => Token::Null,
        }
    }
}

impl Expr {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.ident(t).push(Token::Dot);
                }
                ts.ident(column);
            }
            Expr::Literal(lit) => {
                ts.push(lit.to_token());
            }
            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens())
                    .space()
                    .push(Token::Operator(*op))
                    .space()
                    .append(&right.to_tokens());
            }
            Expr::Function { name, args } => {
                ts.push(Token::Function(name.clone()))
                    .lparen()
                    .comma_separated(args.iter().map(Expr::to_tokens))
                    .rparen();
            }
            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }
        ts
    }
}

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.to_string(),
    }
}

pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.to_string()),
        column: column.to_string(),
    }
}

/// Split a `table.column` path at its last dot.
///
/// An unqualified name becomes a plain column reference.
pub fn column_path(path: &str) -> Expr {
    match path.rsplit_once('.') {
        Some((table, column)) if !table.is_empty() => table_col(table, column),
        _ => col(path),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Literal::Int(n).into()
}

pub fn lit_float(f: f64) -> Expr {
    Literal::Float(f).into()
}

pub fn lit_str(s: &str) -> Expr {
    Literal::String(s.to_string()).into()
}

pub fn lit_bool(b: bool) -> Expr {
    Literal::Bool(b).into()
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.to_string(),
        args,
    }
}

pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.to_string())
}

/// Infix helpers for building conditions, e.g. `col("a").eq(1_i64).and(..)`.
pub trait ExprExt: Into<Expr> {
    fn binary(self, op: BinaryOperator, rhs: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into()),
            op,
            right: Box::new(rhs.into()),
        }
    }

    fn eq(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, rhs)
    }

    fn gt(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, rhs)
    }

    fn like(self, pattern: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Like, pattern)
    }

    fn and(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, rhs)
    }

    /// Wrap as a SELECT item with `AS name`.
    fn alias(self, name: &str) -> super::query::SelectExpr {
        super::query::SelectExpr::new(self.into()).with_alias(name)
    }
}

impl ExprExt for Expr {}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

macro_rules! literal_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Literal::$variant(v.into()).into()
                }
            }
        )*
    };
}

literal_from! {
    i64 => Int,
    f64 => Float,
    bool => Bool,
    String => String,
    &str => String,
}
