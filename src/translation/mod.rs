//! Join inference for predicates over translated attributes.
//!
//! A translated attribute lives in a separate translation table. Before a
//! predicate mentioning such attributes can filter the base relation, the
//! translation tables must be joined, and the join kind decides which rows
//! survive: `INNER` drops base rows without a translation row, `LEFT OUTER`
//! keeps them with NULL values.
//!
//! - [`join_kind`] - the two-point `Inner`/`Outer` lattice and its merge rule
//! - [`visitor`] - node classification and the visitor dispatch
//! - [`key_value`] - one shared table keyed by attribute name
//! - [`table`] - one translation row per (record, locale)
//! - [`materialize`] - attaching inferred joins and inverting predicates

pub mod error;
pub mod join_kind;
pub mod key_value;
pub mod materialize;
pub mod table;
pub mod visitor;

use std::sync::atomic::{AtomicU64, Ordering};

use inflector::Inflector;
use serde::Serialize;

use crate::sql::{table_star, Expr, Query, TableRef};

pub use error::{TranslationError, TranslationResult};
pub use join_kind::JoinKind;
pub use key_value::{KeyValueBackend, KeyValueColumns, KeyValueType};
pub use materialize::{apply_join, invert_predicate};
pub use table::TableBackend;

// =============================================================================
// Locale
// =============================================================================

/// A locale tag such as `en` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used inside join aliases: lowercase, `-` replaced by `_`.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase().replace('-', "_")
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::new(tag)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Backend identity
// =============================================================================

static NEXT_BACKEND_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one configured backend instance.
///
/// Two backends of the same strategy over the same model are still distinct:
/// a visitor only claims references carrying its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BackendId(u64);

impl BackendId {
    pub fn next() -> Self {
        BackendId(NEXT_BACKEND_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// Model
// =============================================================================

/// The base relation whose records own translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub table: String,
    pub primary_key: String,
    /// Owner type stored by polymorphic translation tables (`Post`).
    pub type_name: String,
    /// Singular name used to derive translation table names (`post`).
    pub singular: String,
}

impl ModelRef {
    /// Model over `table`, with `id` as primary key and names inflected
    /// from the table (`blog_posts` gives `blog_post` and `BlogPost`).
    pub fn new(table: &str) -> Self {
        let singular = table.to_singular();
        Self {
            table: table.into(),
            primary_key: "id".into(),
            type_name: singular.to_pascal_case(),
            singular,
        }
    }

    pub fn with_primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_type_name(mut self, type_name: &str) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// `SELECT table.* FROM table`.
    pub fn base_query(&self) -> Query {
        Query::new()
            .select(vec![table_star(&self.table)])
            .from(TableRef::new(&self.table))
    }
}

// =============================================================================
// Translated references
// =============================================================================

/// A predicate leaf standing for a translated attribute in one locale.
///
/// Built by [`Backend::build_node`]; renders as `table.column` on the join
/// target the backend will attach.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslatedRef {
    pub backend: BackendId,
    pub attribute: String,
    pub locale: Locale,
    /// Join target alias.
    pub table: String,
    /// Column on the join target holding the value.
    pub column: String,
}

// =============================================================================
// Join plans
// =============================================================================

/// A translation table join, identified by its alias.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTarget {
    pub table: TableRef,
    pub on: Expr,
}

impl JoinTarget {
    pub fn alias(&self) -> &str {
        self.table.reference_name()
    }
}

/// One join a predicate needs, with the kind inferred for it.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequirement {
    /// Attribute the join serves; `None` for backends with a single join.
    pub attribute: Option<String>,
    pub target: JoinTarget,
    pub kind: JoinKind,
}

// =============================================================================
// Backend
// =============================================================================

/// A translation storage strategy bound to one model.
pub trait Backend: std::fmt::Debug + Send + Sync {
    fn id(&self) -> BackendId;

    /// Strategy name (`key_value`, `table`).
    fn name(&self) -> &'static str;

    fn model(&self) -> &ModelRef;

    /// Attributes this backend translates.
    fn attributes(&self) -> &[String];

    fn translates(&self, attribute: &str) -> bool {
        self.attributes().iter().any(|a| a == attribute)
    }

    /// Predicate leaf for `attribute` in `locale`.
    fn build_node(&self, attribute: &str, locale: &Locale) -> TranslationResult<Expr>;

    /// Joins `predicate` needs from this backend, without touching a query.
    fn plan_joins(
        &self,
        predicate: &Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Vec<JoinRequirement>>;

    /// Attach every join `predicate` needs to `query`.
    ///
    /// The predicate itself is not attached.
    fn apply_joins(
        &self,
        query: Query,
        predicate: &Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Query> {
        let plan = self.plan_joins(predicate, locale, invert)?;
        Ok(plan
            .into_iter()
            .fold(query, |query, req| apply_join(query, req.target, req.kind)))
    }

    /// Attach the joins and then the predicate (negated when `invert`).
    fn add_translations(
        &self,
        query: Query,
        predicate: Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Query> {
        let query = self.apply_joins(query, &predicate, locale, invert)?;
        let predicate = if invert {
            invert_predicate(predicate)
        } else {
            predicate
        };
        Ok(query.filter(predicate))
    }
}

pub(crate) fn unknown_attribute(backend: &dyn Backend, attribute: &str) -> TranslationError {
    TranslationError::UnknownAttribute {
        backend: backend.name(),
        model: backend.model().table.clone(),
        attribute: attribute.into(),
    }
}
