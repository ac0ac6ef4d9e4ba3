//! SQL generation module.
//!
//! This module provides the type-safe query representation that the
//! translation layer extends with joins and filters:
//!
//! - [`query`] - SELECT query builder (the relation)
//! - [`expr`] - Expression AST and builder DSL (the predicate tree)
//! - [`parse`] - Parse textual predicates into the expression AST
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod parse;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    col, func, lit_bool, lit_float, lit_int, lit_null, lit_str, table_col, table_star,
    BinaryOperator, Expr, ExprExt, Literal, UnaryOperator,
};
pub use parse::{parse_predicate, ParseError};
pub use query::{Join, JoinType, Query, TableRef};
pub use token::{Keyword, Token, TokenStream};
