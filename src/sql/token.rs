//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic; identifiers, literals and a few operators
//! only take their final spelling when serialized for a [`Dialect`].

use super::dialect::{Dialect, SqlDialect};

/// Reserved words, spelled the same in every supported dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    On,
    Join,
    Inner,
    Left,
    Outer,
    Case,
    When,
    Then,
    Else,
    End,
    In,
    Between,
    Like,
    IsNull,
    IsNotNull,
    True,
    False,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        use Keyword::*;
        match self {
            Select => "SELECT",
            From => "FROM",
            Where => "WHERE",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            As => "AS",
            On => "ON",
            Join => "JOIN",
            Inner => "INNER",
            Left => "LEFT",
            Outer => "OUTER",
            Case => "CASE",
            When => "WHEN",
            Then => "THEN",
            Else => "ELSE",
            End => "END",
            In => "IN",
            Between => "BETWEEN",
            Like => "LIKE",
            IsNull => "IS NULL",
            IsNotNull => "IS NOT NULL",
            True => "TRUE",
            False => "FALSE",
        }
    }
}

/// Everything the query builder can emit.
///
/// Adding a variant breaks every exhaustive match that must handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),

    // Punctuation
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // Operators
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    /// `||`, or the dialect's replacement.
    Concat,

    // Layout
    Space,
    Newline,
    Indent(usize),

    /// Table, column or alias name.
    Ident(String),
    LitInt(i64),
    LitFloat(f64),
    LitString(String),
    LitBool(bool),
    LitNull,

    /// Function name, remapped per dialect on serialization.
    FunctionName(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        let fixed = match self {
            Token::Keyword(kw) => kw.as_str(),
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Star | Token::Mul => "*",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Div => "/",
            Token::Mod => "%",
            Token::Concat => dialect.concat_operator(),
            Token::Space => " ",
            Token::Newline => "\n",
            Token::LitBool(b) => dialect.format_bool(*b),
            Token::LitNull => dialect.format_null(),
            Token::Indent(n) => return "  ".repeat(*n),
            Token::Ident(name) => return dialect.quote_identifier(name),
            Token::LitInt(n) => return n.to_string(),
            Token::LitFloat(f) => return format_float(*f),
            Token::LitString(s) => return dialect.quote_string(s),
            Token::FunctionName(name) => {
                return dialect
                    .remap_function(name)
                    .map_or_else(|| name.to_uppercase(), str::to_uppercase)
            }
        };
        fixed.to_string()
    }
}

/// Shortest round-trip representation.
///
/// Panics on NaN and infinity, which have no SQL literal. Parsed predicates
/// never contain them.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        panic!("Cannot serialize NaN to SQL")
    }
    if f.is_infinite() {
        panic!("Cannot serialize Infinity to SQL")
    }
    ryu::Buffer::new().format(f).to_string()
}

/// A stream of tokens that can be serialized to SQL.
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

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    pub fn keyword(&mut self, kw: Keyword) -> &mut Self {
        self.push(Token::Keyword(kw))
    }
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
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
