//! End-to-end compilation from a textual predicate to SQL.
//!
//! ```text
//! Predicate text → Parse (resolve translated names) → Infer joins → Query → SQL
//! ```
//!
//! # Example
//!
//! ```ignore
//! use translayer::compile::{compile_predicate, CompileOptions};
//! use translayer::config::Settings;
//! use translayer::Dialect;
//!
//! let registry = Settings::from_file("translayer.toml")?.build_registry()?;
//! let posts = registry.model("posts")?;
//!
//! let options = CompileOptions::new("fr").with_dialect(Dialect::Postgres);
//! let output = compile_predicate(posts, "title = 'foo' OR title IS NULL", &options)?;
//! println!("{}", output.sql);
//! ```

use serde::Serialize;

use crate::registry::ModelTranslations;
use crate::sql::{Dialect, ParseError, Query};
use crate::translation::{JoinKind, JoinRequirement, Locale, TranslationError};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Translation error: {0}")]
    TranslationError(#[from] TranslationError),
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Locale translated attributes are read in.
    pub locale: Locale,

    /// SQL dialect to generate.
    pub dialect: Dialect,

    /// Select the records for which the predicate does not hold.
    pub invert: bool,
}

impl CompileOptions {
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            dialect: Dialect::Postgres,
            invert: false,
        }
    }

    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// One inferred join, in a form suitable for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedJoin {
    pub backend: &'static str,
    pub attribute: Option<String>,
    pub table: String,
    pub alias: String,
    pub kind: JoinKind,
}

/// Result of compiling a predicate to SQL.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The generated SQL string.
    pub sql: String,

    /// The SQL query AST (for further manipulation if needed).
    pub query: Query,

    /// The joins inferred for the predicate, per backend.
    pub joins: Vec<PlannedJoin>,

    /// The dialect used for generation.
    pub dialect: Dialect,
}

// ============================================================================
// Compilation Functions
// ============================================================================

/// Compile `predicate` against `model` into a full SELECT.
pub fn compile_predicate(
    model: &ModelTranslations,
    predicate: &str,
    options: &CompileOptions,
) -> CompileResult<CompileOutput> {
    let predicate = model.parse(predicate, &options.locale)?;

    let mut plan = vec![];
    let mut joins = vec![];
    for backend in model.backends() {
        for req in backend.plan_joins(&predicate, &options.locale, options.invert)? {
            joins.push(planned(backend.name(), &req));
            plan.push(req);
        }
    }

    let query = model.apply_plan(model.base_query(), plan, predicate, options.invert);

    Ok(CompileOutput {
        sql: query.to_sql(options.dialect),
        query,
        joins,
        dialect: options.dialect,
    })
}

fn planned(backend: &'static str, req: &JoinRequirement) -> PlannedJoin {
    PlannedJoin {
        backend,
        attribute: req.attribute.clone(),
        table: req.target.table.table.clone(),
        alias: req.target.alias().to_string(),
        kind: req.kind,
    }
}

// ============================================================================
// Tests
// ============================================================================
