//! Attaching inferred joins to a query, and predicate negation.

use tracing::trace;

use crate::sql::{BinaryOperator, Expr, Query, UnaryOperator};

use super::{JoinKind, JoinTarget};

/// Attach `target` to `query` with at least `kind`.
///
/// An existing join with the same alias is kept when it already satisfies
/// `kind`; an existing outer join is replaced when `kind` is `Inner`.
/// Never downgrades, never duplicates.
pub fn apply_join(query: Query, target: JoinTarget, kind: JoinKind) -> Query {
    let alias = target.alias().to_string();
    let existing = query.find_join(&alias).map(|join| JoinKind::from(join.join_type));

    match existing {
        Some(current) if current.satisfies(kind) => {
            trace!(%alias, %current, required = %kind, "join already present");
            query
        }
        Some(current) => {
            trace!(%alias, %current, required = %kind, "upgrading join");
            query
                .remove_join(&alias)
                .join(kind.into(), target.table, target.on)
        }
        None => {
            trace!(%alias, %kind, "adding join");
            query.join(kind.into(), target.table, target.on)
        }
    }
}

/// Logical negation of a predicate, pushed into the outermost node where a
/// direct inverse exists.
///
/// `=` and `<>` swap, `IN`/`IS NULL` toggle their negation, `NOT x` unwraps.
/// Anything else is wrapped in `NOT`.
pub fn invert_predicate(predicate: Expr) -> Expr {
    match predicate {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            right,
        } => Expr::BinaryOp {
            left,
            op: BinaryOperator::Ne,
            right,
        },
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Ne,
            right,
        } => Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            right,
        },
        Expr::In {
            expr,
            values,
            negated,
        } => Expr::In {
            expr,
            values,
            negated: !negated,
        },
        Expr::IsNull { expr, negated } => Expr::IsNull {
            expr,
            negated: !negated,
        },
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => *expr,
        other => Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(other),
        },
    }
}
