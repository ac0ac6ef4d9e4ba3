//! Parse textual predicates into the expression AST.
//!
//! Conditions arrive as SQL text (`title = 'foo' OR title IS NULL`). They are
//! parsed with sqlparser and lowered into [`Expr`]. Bare identifiers are
//! offered to a resolver first, which is how translated attributes enter the
//! tree; anything the resolver does not claim stays a plain column.

use sqlparser::ast::{
    self, BinaryOperator as SqlBinaryOperator, FunctionArg, FunctionArgExpr, FunctionArguments,
    UnaryOperator as SqlUnaryOperator, Value,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::Token;
use thiserror::Error;

use super::expr::{
    col, lit_bool, lit_float, lit_int, lit_null, lit_str, table_col, BinaryOperator, Expr,
    UnaryOperator,
};

/// Errors raised while lowering a textual predicate.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid predicate: {0}")]
    Syntax(#[from] ParserError),

    #[error("Unsupported predicate construct: {0}")]
    Unsupported(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse `text` as a boolean SQL expression.
///
/// `resolve` is called with every bare identifier; returning `Some` replaces
/// the identifier with that expression.
pub fn parse_predicate(text: &str, resolve: impl Fn(&str) -> Option<Expr>) -> ParseResult<Expr> {
    let dialect = GenericDialect {};
    let mut parser = Parser::new(&dialect).try_with_sql(text)?;
    let ast = parser.parse_expr()?;
    parser.expect_token(&Token::EOF)?;
    lower(&ast, &resolve)
}

fn lower(node: &ast::Expr, resolve: &impl Fn(&str) -> Option<Expr>) -> ParseResult<Expr> {
    Ok(match node {
        ast::Expr::Identifier(ident) => resolve(&ident.value).unwrap_or_else(|| col(&ident.value)),

        ast::Expr::CompoundIdentifier(parts) => match parts.as_slice() {
            [table, column] => table_col(&table.value, &column.value),
            _ => return Err(unsupported(node)),
        },

        ast::Expr::Value(value) => lower_value(value)?,

        ast::Expr::Nested(inner) => Expr::Paren(Box::new(lower(inner, resolve)?)),

        ast::Expr::BinaryOp { left, op, right } => Expr::BinaryOp {
            left: Box::new(lower(left, resolve)?),
            op: lower_binary_op(op).ok_or_else(|| unsupported(node))?,
            right: Box::new(lower(right, resolve)?),
        },

        ast::Expr::UnaryOp { op, expr } => {
            let op = match op {
                SqlUnaryOperator::Not => UnaryOperator::Not,
                SqlUnaryOperator::Minus => UnaryOperator::Minus,
                SqlUnaryOperator::Plus => return lower(expr, resolve),
                _ => return Err(unsupported(node)),
            };
            Expr::UnaryOp {
                op,
                expr: Box::new(lower(expr, resolve)?),
            }
        }

        ast::Expr::IsNull(expr) => Expr::IsNull {
            expr: Box::new(lower(expr, resolve)?),
            negated: false,
        },

        ast::Expr::IsNotNull(expr) => Expr::IsNull {
            expr: Box::new(lower(expr, resolve)?),
            negated: true,
        },

        ast::Expr::InList {
            expr,
            list,
            negated,
        } => Expr::In {
            expr: Box::new(lower(expr, resolve)?),
            values: list
                .iter()
                .map(|item| lower(item, resolve))
                .collect::<ParseResult<_>>()?,
            negated: *negated,
        },

        ast::Expr::Between {
            expr,
            negated,
            low,
            high,
        } => Expr::Between {
            expr: Box::new(lower(expr, resolve)?),
            low: Box::new(lower(low, resolve)?),
            high: Box::new(lower(high, resolve)?),
            negated: *negated,
        },

        ast::Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => {
            let like = Expr::BinaryOp {
                left: Box::new(lower(expr, resolve)?),
                op: BinaryOperator::Like,
                right: Box::new(lower(pattern, resolve)?),
            };
            if *negated {
                Expr::UnaryOp {
                    op: UnaryOperator::Not,
                    expr: Box::new(like),
                }
            } else {
                like
            }
        }

        ast::Expr::Function(function) => {
            let args = match &function.args {
                FunctionArguments::None => vec![],
                FunctionArguments::List(list) => list
                    .args
                    .iter()
                    .map(|arg| match arg {
                        FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => lower(expr, resolve),
                        _ => Err(unsupported(node)),
                    })
                    .collect::<ParseResult<_>>()?,
                FunctionArguments::Subquery(_) => return Err(unsupported(node)),
            };
            Expr::Function {
                name: function.name.to_string(),
                args,
            }
        }

        _ => return Err(unsupported(node)),
    })
}

fn lower_value(value: &Value) -> ParseResult<Expr> {
    Ok(match value {
        Value::Number(n, _) => match n.parse::<i64>() {
            Ok(i) => lit_int(i),
            // SQL has no literal for values out of f64 range.
            Err(_) => lit_float(
                n.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| ParseError::Unsupported(format!("number {}", n)))?,
            ),
        },
        Value::SingleQuotedString(s) => lit_str(s),
        Value::Boolean(b) => lit_bool(*b),
        Value::Null => lit_null(),
        other => return Err(ParseError::Unsupported(other.to_string())),
    })
}

fn lower_binary_op(op: &SqlBinaryOperator) -> Option<BinaryOperator> {
    Some(match op {
        SqlBinaryOperator::Eq => BinaryOperator::Eq,
        SqlBinaryOperator::NotEq => BinaryOperator::Ne,
        SqlBinaryOperator::Lt => BinaryOperator::Lt,
        SqlBinaryOperator::Gt => BinaryOperator::Gt,
        SqlBinaryOperator::LtEq => BinaryOperator::Lte,
        SqlBinaryOperator::GtEq => BinaryOperator::Gte,
        SqlBinaryOperator::And => BinaryOperator::And,
        SqlBinaryOperator::Or => BinaryOperator::Or,
        SqlBinaryOperator::Plus => BinaryOperator::Plus,
        SqlBinaryOperator::Minus => BinaryOperator::Minus,
        SqlBinaryOperator::Multiply => BinaryOperator::Mul,
        SqlBinaryOperator::Divide => BinaryOperator::Div,
        SqlBinaryOperator::Modulo => BinaryOperator::Mod,
        SqlBinaryOperator::StringConcat => BinaryOperator::Concat,
        _ => return None,
    })
}

fn unsupported(node: &ast::Expr) -> ParseError {
    ParseError::Unsupported(node.to_string())
}
