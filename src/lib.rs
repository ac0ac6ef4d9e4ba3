//! # translayer
//!
//! Join inference for predicates over translated model attributes.
//!
//! ## Architecture
//!
//! A translated attribute lives outside the model's own table. Filtering on
//! it needs a join on the translation storage, and the join kind decides
//! which records survive. translayer walks the predicate, infers the join
//! kind every translation target needs, and attaches joins and filter to a
//! query that compiles to multi-dialect SQL:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Config (models, backends, attributes)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [registry]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Predicate (Expr with translated attribute leaves)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [visitor: key-value / table]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Join requirements (target -> Inner/Outer)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [materializer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SQL Query                             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod registry;
pub mod sql;
pub mod translation;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile_predicate, CompileError, CompileOptions, CompileOutput};
    pub use crate::config::{ConfigError, Settings};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::expr::{
        // Constructors
        col,
        func,
        lit_bool,
        lit_float,
        lit_int,
        lit_null,
        lit_str,
        table_col,
        table_star,
        // Types
        BinaryOperator,
        Expr,
        ExprExt,
        Literal,
        UnaryOperator,
    };
    pub use crate::query::{Join, JoinType, Query, TableRef};
    pub use crate::registry::{ModelTranslations, Registry};
    pub use crate::translation::{
        apply_join, invert_predicate, Backend, JoinKind, KeyValueBackend, KeyValueColumns,
        KeyValueType, Locale, ModelRef, TableBackend, TranslatedRef, TranslationError,
    };
}

// Also export at crate root for convenience
pub use dialect::Dialect;
pub use expr::{col, lit_null, lit_str, table_col, Expr, ExprExt};
pub use query::Query;
pub use translation::{Backend, JoinKind, Locale};
