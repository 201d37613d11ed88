//! Tokens for the builder's SELECT statements.
//!
//! A [`TokenStream`] is built once per query and serialized per [`Dialect`].
//! Only identifiers and literals differ between dialects; keywords,
//! operators and layout are fixed.

use super::dialect::{Dialect, SqlDialect};
use super::expr::BinaryOperator;

/// Reserved words the builder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Join,
    On,
    Where,
    GroupBy,
    OrderBy,
    As,
    Asc,
    Desc,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Join => "JOIN",
            Keyword::On => "ON",
            Keyword::Where => "WHERE",
            Keyword::GroupBy => "GROUP BY",
            Keyword::OrderBy => "ORDER BY",
            Keyword::As => "AS",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    Operator(BinaryOperator),

    Comma,
    Dot,
    LParen,
    RParen,

    Space,
    Newline,
    /// Continuation indent for SELECT items after the first.
    Indent,

    /// Table, column or alias name, quoted per dialect.
    Ident(String),
    Int(i64),
    /// Non-finite values have no SQL literal and render as NULL.
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    /// Aggregate or other function name, upper-cased on output.
    Function(String),

    /// Verbatim text, never escaped. Filter operands compared with `<`, `>`,
    /// `<=` or `>=` take this path, which makes it an injection vector for
    /// untrusted input.
    Raw(String),
}

const INDENT: &str = "    ";

impl Token {
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::Keyword(kw) => kw.as_str().to_string(),
            Token::Operator(op) => op.symbol().to_string(),

            Token::Comma => ",".to_string(),
            Token::Dot => ".".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),

            Token::Space => " ".to_string(),
            Token::Newline => "\n".to_string(),
            Token::Indent => INDENT.to_string(),

            Token::Ident(name) => dialect.quote_identifier(name),
            Token::Int(n) => n.to_string(),
            Token::Float(f) if f.is_finite() => ryu::Buffer::new().format_finite(*f).to_string(),
            Token::Float(_) => dialect.format_null().to_string(),
            Token::Str(s) => dialect.quote_string(s),
            Token::Bool(b) => dialect.format_bool(*b).to_string(),
            Token::Null => dialect.format_null().to_string(),
            Token::Function(name) => name.to_uppercase(),

            Token::Raw(sql) => sql.clone(),
        }
    }
}

/// Tokens in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Append each part, separated by `, `.
    pub fn comma_separated(&mut self, parts: impl IntoIterator<Item = TokenStream>) -> &mut Self {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.append(&part);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    pub fn keyword(&mut self, kw: Keyword) -> &mut Self {
        self.push(Token::Keyword(kw))
    }

    pub fn ident(&mut self, name: &str) -> &mut Self {
        self.push(Token::Ident(name.to_string()))
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }

    pub fn indent(&mut self) -> &mut Self {
        self.push(Token::Indent)
    }

    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }

    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }

    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
