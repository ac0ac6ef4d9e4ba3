//! Errors raised while compiling translated predicates.

use thiserror::Error;

/// Errors that abort a predicate compilation.
///
/// Foreign attributes and untranslated columns are never errors: they
/// contribute no join requirement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    /// A node shape the join inference cannot see through contains a
    /// translated attribute that needs a join.
    #[error("Unsupported {node} expression around translated attribute '{attribute}'")]
    UnsupportedNode {
        node: &'static str,
        attribute: String,
    },

    /// No backend of the model translates the attribute.
    #[error("Model '{model}' has no translated attribute '{attribute}'")]
    ForeignAttribute { model: String, attribute: String },

    /// The attribute is not declared on this backend.
    #[error("Attribute '{attribute}' is not translated by the {backend} backend of '{model}'")]
    UnknownAttribute {
        backend: &'static str,
        model: String,
        attribute: String,
    },
}

pub type TranslationResult<T> = Result<T, TranslationError>;
