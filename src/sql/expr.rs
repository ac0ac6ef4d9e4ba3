//! Predicate trees.
//!
//! [`Expr`] covers the SQL a filter condition can contain. Translated
//! attributes are [`Expr::Translated`] leaves; they render as the value
//! column of the join the owning backend attaches.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Keyword, Token, TokenStream};
use crate::translation::TranslatedRef;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `column` or `table.column`.
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

    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    Function { name: String, args: Vec<Expr> },

    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`. Join inference cannot
    /// see through it.
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    IsNull { expr: Box<Expr>, negated: bool },

    /// `*` or `table.*`, only meaningful in a select list.
    Star { table: Option<String> },

    Paren(Box<Expr>),

    /// A translated attribute in one locale, e.g.
    /// `"post_title_en_string_translations"."value"`.
    Translated(TranslatedRef),
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
    And,
    Or,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Concat,
    Like,
}

impl BinaryOperator {
    /// Binding strength used to decide where parentheses are required.
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte
            | BinaryOperator::Like => 4,
            BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Concat => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl Expr {
    /// Tokens for [`Dialect::default`].
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Some constructs are spelled per dialect (`CONCAT()` on MySQL), so the
    /// token stream already depends on it.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Translated(attr) => {
                ts.push(Token::Ident(attr.table.clone()));
                ts.push(Token::Dot);
                ts.push(Token::Ident(attr.column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Bool(b) => Token::LitBool(*b),
                    Literal::Null => Token::LitNull,
                });
            }

            Expr::BinaryOp { left, op, right } => {
                // `x = NULL` and `NULL = x` are never true in SQL; emit the
                // IS [NOT] NULL form on the other operand.
                let null_side = match op {
                    BinaryOperator::Eq | BinaryOperator::Ne => {
                        if right.is_null_literal() {
                            Some(left)
                        } else if left.is_null_literal() {
                            Some(right)
                        } else {
                            None
                        }
                    }
                    _ => None,
                };
                if let Some(operand) = null_side {
                    append_operand(&mut ts, operand, 5, dialect);
                    ts.space().keyword(if *op == BinaryOperator::Eq {
                        Keyword::IsNull
                    } else {
                        Keyword::IsNotNull
                    });
                } else if *op == BinaryOperator::Concat && !dialect.supports_concat_operator() {
                    ts.push(Token::FunctionName("CONCAT".into()));
                    ts.lparen();
                    ts.append(&left.to_tokens_for_dialect(dialect));
                    ts.comma().space();
                    ts.append(&right.to_tokens_for_dialect(dialect));
                    ts.rparen();
                } else {
                    append_operand(&mut ts, left, op.precedence(), dialect);
                    ts.space();
                    ts.push(binary_op_to_token(*op));
                    ts.space();
                    append_operand(&mut ts, right, op.precedence(), dialect);
                }
            }

            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Not => {
                    ts.keyword(Keyword::Not).space();
                    append_operand(&mut ts, expr, 3, dialect);
                }
                UnaryOperator::Minus => {
                    ts.push(Token::Minus);
                    append_operand(&mut ts, expr, 7, dialect);
                }
            },

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens_for_dialect(dialect));
                }
                ts.rparen();
            }

            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                ts.keyword(Keyword::Case);
                if let Some(op) = operand {
                    ts.space().append(&op.to_tokens_for_dialect(dialect));
                }
                for (when, then) in when_clauses {
                    ts.space().keyword(Keyword::When).space();
                    ts.append(&when.to_tokens_for_dialect(dialect));
                    ts.space().keyword(Keyword::Then).space();
                    ts.append(&then.to_tokens_for_dialect(dialect));
                }
                if let Some(else_expr) = else_clause {
                    ts.space().keyword(Keyword::Else).space();
                    ts.append(&else_expr.to_tokens_for_dialect(dialect));
                }
                ts.space().keyword(Keyword::End);
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL: it is FALSE, "x NOT IN ()" is TRUE
                if values.is_empty() {
                    ts.keyword(if *negated { Keyword::True } else { Keyword::False });
                } else {
                    append_operand(&mut ts, expr, 5, dialect);
                    if *negated {
                        ts.space().keyword(Keyword::Not);
                    }
                    ts.space().keyword(Keyword::In).space().lparen();
                    for (i, val) in values.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.append(&val.to_tokens_for_dialect(dialect));
                    }
                    ts.rparen();
                }
            }

            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                append_operand(&mut ts, expr, 5, dialect);
                if *negated {
                    ts.space().keyword(Keyword::Not);
                }
                ts.space().keyword(Keyword::Between).space();
                append_operand(&mut ts, low, 5, dialect);
                ts.space().keyword(Keyword::And).space();
                append_operand(&mut ts, high, 5, dialect);
            }

            Expr::IsNull { expr, negated } => {
                append_operand(&mut ts, expr, 5, dialect);
                ts.space().keyword(if *negated {
                    Keyword::IsNotNull
                } else {
                    Keyword::IsNull
                });
            }

            Expr::Star { table } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens_for_dialect(dialect));
                ts.rparen();
            }
        }

        ts
    }

    /// Binding strength of this expression when used as an operand.
    fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryOp { op, .. } => op.precedence(),
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => 3,
            Expr::In { .. } | Expr::Between { .. } | Expr::IsNull { .. } => 4,
            _ => u8::MAX,
        }
    }

    /// Whether this expression is the NULL literal.
    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expr::Literal(Literal::Null))
    }

    /// Direct child expressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::BinaryOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::UnaryOp { expr, .. } | Expr::IsNull { expr, .. } | Expr::Paren(expr) => {
                vec![expr.as_ref()]
            }
            Expr::Function { args, .. } => args.iter().collect(),
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                let mut out: Vec<&Expr> = operand.iter().map(|e| e.as_ref()).collect();
                for (when, then) in when_clauses {
                    out.push(when);
                    out.push(then);
                }
                out.extend(else_clause.iter().map(|e| e.as_ref()));
                out
            }
            Expr::In { expr, values, .. } => {
                let mut out = vec![expr.as_ref()];
                out.extend(values.iter());
                out
            }
            Expr::Between {
                expr, low, high, ..
            } => vec![expr.as_ref(), low.as_ref(), high.as_ref()],
            Expr::Column { .. } | Expr::Literal(_) | Expr::Star { .. } | Expr::Translated(_) => {
                vec![]
            }
        }
    }

    /// Find the first translated reference in this tree matching `pred`.
    pub fn find_translated(&self, pred: &impl Fn(&TranslatedRef) -> bool) -> Option<&TranslatedRef> {
        if let Expr::Translated(attr) = self {
            return pred(attr).then_some(attr);
        }
        self.children()
            .into_iter()
            .find_map(|child| child.find_translated(pred))
    }
}

/// Append `expr`, parenthesized when it binds looser than `min_precedence`.
fn append_operand(ts: &mut TokenStream, expr: &Expr, min_precedence: u8, dialect: Dialect) {
    if expr.precedence() < min_precedence {
        ts.lparen();
        ts.append(&expr.to_tokens_for_dialect(dialect));
        ts.rparen();
    } else {
        ts.append(&expr.to_tokens_for_dialect(dialect));
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::Keyword(Keyword::And),
        BinaryOperator::Or => Token::Keyword(Keyword::Or),
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Mod => Token::Mod,
        BinaryOperator::Concat => Token::Concat,
        BinaryOperator::Like => Token::Keyword(Keyword::Like),
    }
}

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// `table.*`
pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// Fluent predicate building over expressions and translated references.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    fn like(self, pattern: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    fn paren(self) -> Expr {
        Expr::Paren(Box::new(self.into_expr()))
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl ExprExt for TranslatedRef {
    fn into_expr(self) -> Expr {
        Expr::Translated(self)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n.into())
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

/// `None` becomes the NULL literal, so `attr.eq(None::<&str>)` reads naturally.
impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(lit_null, Into::into)
    }
}

impl From<TranslatedRef> for Expr {
    fn from(attr: TranslatedRef) -> Self {
        Expr::Translated(attr)
    }
}
