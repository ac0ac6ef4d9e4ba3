//! Join kinds and their merge rule.

use serde::Serialize;

use crate::sql::JoinType;

/// How a translation table must be joined for a predicate to hold.
///
/// `Inner` is the stronger requirement (the translation row must exist),
/// `Outer` the weaker one (a missing row still satisfies the predicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Outer,
}

impl JoinKind {
    /// Merge two occurrences of the same join target.
    ///
    /// `Inner` only if both are `Inner`. Commutative, associative and
    /// idempotent; once `Outer`, always `Outer`.
    pub fn merge(self, other: JoinKind) -> JoinKind {
        match (self, other) {
            (JoinKind::Inner, JoinKind::Inner) => JoinKind::Inner,
            _ => JoinKind::Outer,
        }
    }

    /// Kind to use when the predicate is negated.
    ///
    /// A negated comparison needs the row to exist and fail the comparison,
    /// so every join becomes `Inner`.
    pub fn for_predicate(self, invert: bool) -> JoinKind {
        if invert {
            JoinKind::Inner
        } else {
            self
        }
    }

    /// Whether an existing join of kind `self` already satisfies `required`.
    pub fn satisfies(self, required: JoinKind) -> bool {
        self == JoinKind::Inner || required == JoinKind::Outer
    }
}

impl From<JoinKind> for JoinType {
    fn from(kind: JoinKind) -> Self {
        match kind {
            JoinKind::Inner => JoinType::Inner,
            JoinKind::Outer => JoinType::Left,
        }
    }
}

impl From<JoinType> for JoinKind {
    fn from(join_type: JoinType) -> Self {
        match join_type {
            JoinType::Inner => JoinKind::Inner,
            JoinType::Left => JoinKind::Outer,
        }
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "inner"),
            JoinKind::Outer => write!(f, "outer"),
        }
    }
}
