//! Visitor dispatch over predicate trees.
//!
//! Every [`Expr`] variant is first classified into a [`Node`] family. The
//! [`Visitor`] trait then has one method per family, and each method
//! defaults to its more general family: an equality or a conjunction is a
//! collection of its operands, `OR` is a binary node, a binary node is a
//! collection of two. A visitor overrides only the families it treats
//! specially.
//!
//! Classification is a plain `match`, so dispatch costs the same on every
//! call and never depends on earlier calls.

use crate::sql::{BinaryOperator, Expr, UnaryOperator};

use super::error::{TranslationError, TranslationResult};
use super::TranslatedRef;

/// The family an expression belongs to for join inference.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// A translated attribute reference.
    Attribute(&'a TranslatedRef),
    /// `a = b`, `a IS NULL`, `a IN (...)`. `operands` excludes NULL
    /// literals; `null` records whether one was compared against.
    Equality { operands: Vec<&'a Expr>, null: bool },
    Or(&'a Expr, &'a Expr),
    /// Conjunction, with nested `AND`s flattened.
    And(Vec<&'a Expr>),
    Binary(&'a Expr, &'a Expr),
    Unary(&'a Expr),
    Collection(Vec<&'a Expr>),
    /// Nodes that can never hold a translated attribute of this query.
    Leaf,
    /// Nodes the inference cannot see through.
    Unsupported(&'static str),
}

impl<'a> Node<'a> {
    pub fn of(expr: &'a Expr) -> Node<'a> {
        match expr {
            Expr::Translated(attr) => Node::Attribute(attr),

            Expr::BinaryOp {
                left,
                op: BinaryOperator::Eq,
                right,
            } => equality([left.as_ref(), right.as_ref()]),

            Expr::BinaryOp {
                left,
                op: BinaryOperator::Or,
                right,
            } => Node::Or(left, right),

            Expr::BinaryOp {
                op: BinaryOperator::And,
                ..
            } => {
                let mut children = Vec::new();
                flatten_and(expr, &mut children);
                Node::And(children)
            }

            Expr::BinaryOp { left, right, .. } => Node::Binary(left, right),

            Expr::IsNull {
                expr,
                negated: false,
            } => Node::Equality {
                operands: vec![expr.as_ref()],
                null: true,
            },

            Expr::In {
                expr,
                values,
                negated: false,
            } => Node::Equality {
                operands: std::iter::once(expr.as_ref())
                    .chain(values.iter().filter(|v| !v.is_null_literal()))
                    .collect(),
                null: false,
            },

            Expr::IsNull {
                expr,
                negated: true,
            } => Node::Unary(expr),

            Expr::UnaryOp {
                op: UnaryOperator::Not | UnaryOperator::Minus,
                expr,
            } => Node::Unary(expr),

            Expr::Paren(inner) => Node::Unary(inner),

            Expr::In { .. } | Expr::Between { .. } | Expr::Function { .. } => {
                Node::Collection(expr.children())
            }

            Expr::Case { .. } => Node::Unsupported("CASE"),

            Expr::Column { .. } | Expr::Literal(_) | Expr::Star { .. } => Node::Leaf,
        }
    }
}

fn equality<'a>(sides: [&'a Expr; 2]) -> Node<'a> {
    let null = sides.iter().any(|side| side.is_null_literal());
    Node::Equality {
        operands: sides
            .into_iter()
            .filter(|side| !side.is_null_literal())
            .collect(),
        null,
    }
}

fn flatten_and<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            flatten_and(left, out);
            flatten_and(right, out);
        }
        other => out.push(other),
    }
}

/// A join-requirement computation over predicate trees.
///
/// `Output::default()` is the result for subtrees with no requirement.
pub trait Visitor {
    type Output: Default;

    /// Whether `attr` belongs to this visitor's backend and locale.
    fn owns(&self, attr: &TranslatedRef) -> bool;

    /// Result for an owned attribute reference.
    fn visit_attribute(&self, attr: &TranslatedRef) -> Self::Output;

    /// Merge the results of two sibling subtrees.
    fn combine(&self, left: Self::Output, right: Self::Output) -> Self::Output;

    fn accept(&self, expr: &Expr) -> TranslationResult<Self::Output> {
        match Node::of(expr) {
            Node::Attribute(attr) if self.owns(attr) => Ok(self.visit_attribute(attr)),
            Node::Attribute(_) | Node::Leaf => Ok(Self::Output::default()),
            Node::Equality { operands, null } => self.visit_equality(&operands, null),
            Node::Or(left, right) => self.visit_or(left, right),
            Node::And(children) => self.visit_and(&children),
            Node::Binary(left, right) => self.visit_binary(left, right),
            Node::Unary(inner) => self.visit_unary(inner),
            Node::Collection(children) => self.visit_collection(&children),
            Node::Unsupported(node) => self.visit_unsupported(expr, node),
        }
    }

    fn visit_equality(&self, operands: &[&Expr], _null: bool) -> TranslationResult<Self::Output> {
        self.visit_collection(operands)
    }

    fn visit_or(&self, left: &Expr, right: &Expr) -> TranslationResult<Self::Output> {
        self.visit_binary(left, right)
    }

    fn visit_and(&self, children: &[&Expr]) -> TranslationResult<Self::Output> {
        self.visit_collection(children)
    }

    fn visit_binary(&self, left: &Expr, right: &Expr) -> TranslationResult<Self::Output> {
        self.visit_collection(&[left, right])
    }

    fn visit_unary(&self, inner: &Expr) -> TranslationResult<Self::Output> {
        self.accept(inner)
    }

    fn visit_collection(&self, children: &[&Expr]) -> TranslationResult<Self::Output> {
        children.iter().try_fold(Self::Output::default(), |acc, child| {
            Ok(self.combine(acc, self.accept(child)?))
        })
    }

    /// Unsupported nodes are only an error when they hide an owned attribute.
    fn visit_unsupported(&self, expr: &Expr, node: &'static str) -> TranslationResult<Self::Output> {
        match expr.find_translated(&|attr: &TranslatedRef| self.owns(attr)) {
            Some(attr) => Err(TranslationError::UnsupportedNode {
                node,
                attribute: attr.attribute.clone(),
            }),
            None => Ok(Self::Output::default()),
        }
    }
}

/// Fail on any unsupported node under `expr` that hides an attribute owned
/// by `visitor`, without computing a result for the rest of the tree.
pub fn reject_unsupported<V: Visitor + ?Sized>(visitor: &V, expr: &Expr) -> TranslationResult<()> {
    if let Node::Unsupported(node) = Node::of(expr) {
        return visitor.visit_unsupported(expr, node).map(drop);
    }
    expr.children()
        .into_iter()
        .try_for_each(|child| reject_unsupported(visitor, child))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::sql::{col, lit_int, lit_null, ExprExt};
    use crate::translation::{BackendId, Locale};

    fn attr(backend: BackendId, name: &str) -> TranslatedRef {
        TranslatedRef {
            backend,
            attribute: name.into(),
            locale: Locale::from("en"),
            table: format!("t_{}", name),
            column: "value".into(),
        }
    }

    /// Counts attribute hits and how often each family handler ran.
    struct Counting {
        backend: BackendId,
        equality: Cell<usize>,
        collection: Cell<usize>,
    }

    impl Visitor for Counting {
        type Output = usize;

        fn owns(&self, attr: &TranslatedRef) -> bool {
            attr.backend == self.backend
        }

        fn visit_attribute(&self, _: &TranslatedRef) -> usize {
            1
        }

        fn combine(&self, left: usize, right: usize) -> usize {
            left + right
        }

        fn visit_equality(&self, operands: &[&Expr], _: bool) -> TranslationResult<usize> {
            self.equality.set(self.equality.get() + 1);
            self.visit_collection(operands)
        }

        fn visit_collection(&self, children: &[&Expr]) -> TranslationResult<usize> {
            self.collection.set(self.collection.get() + 1);
            children
                .iter()
                .try_fold(0, |acc, child| Ok(acc + self.accept(child)?))
        }
    }

    #[test]
    fn test_classify_equality_strips_null() {
        let backend = BackendId::next();
        let expr = attr(backend, "title").eq(lit_null());
        match Node::of(&expr) {
            Node::Equality { operands, null } => {
                assert!(null);
                assert_eq!(operands.len(), 1);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_classify_families() {
        assert!(matches!(Node::of(&col("a").ne(1)), Node::Binary(..)));
        assert!(matches!(Node::of(&col("a").like("x%")), Node::Binary(..)));
        assert!(matches!(Node::of(&col("a").is_not_null()), Node::Unary(_)));
        assert!(matches!(Node::of(&col("a").eq(1).not()), Node::Unary(_)));
        assert!(matches!(
            Node::of(&col("a").is_null()),
            Node::Equality { null: true, .. }
        ));
        assert!(matches!(
            Node::of(&col("a").in_list(vec![lit_int(1)])),
            Node::Equality { null: false, .. }
        ));
        assert!(matches!(
            Node::of(&col("a").not_in_list(vec![lit_int(1)])),
            Node::Collection(_)
        ));
        assert!(matches!(
            Node::of(&col("a").between(1, 2)),
            Node::Collection(_)
        ));
        assert_eq!(Node::of(&col("a")), Node::Leaf);
    }

    #[test]
    fn test_and_is_flattened() {
        let expr = col("a").eq(1).and(col("b").eq(2)).and(col("c").eq(3));
        match Node::of(&expr) {
            Node::And(children) => assert_eq!(children.len(), 3),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_falls_back_to_collection() {
        let backend = BackendId::next();
        let visitor = Counting {
            backend,
            equality: Cell::new(0),
            collection: Cell::new(0),
        };

        // NOT (title = 'a' OR body > 1): unary -> or -> binary -> collection.
        let expr = attr(backend, "title")
            .eq("a")
            .or(attr(backend, "body").gt(1))
            .paren()
            .not();
        assert_eq!(visitor.accept(&expr).unwrap(), 2);
        assert_eq!(visitor.equality.get(), 1);
        // or, equality operands, `>` operands.
        assert_eq!(visitor.collection.get(), 3);
    }

    #[test]
    fn test_repeated_dispatch_is_identical() {
        let backend = BackendId::next();
        let visitor = Counting {
            backend,
            equality: Cell::new(0),
            collection: Cell::new(0),
        };
        let expr = attr(backend, "title").eq("a").and(col("views").gt(3));

        let first = visitor.accept(&expr).unwrap();
        let counts = (visitor.equality.get(), visitor.collection.get());
        let second = visitor.accept(&expr).unwrap();

        assert_eq!(first, second);
        assert_eq!(visitor.equality.get(), counts.0 * 2);
        assert_eq!(visitor.collection.get(), counts.1 * 2);
    }

    #[test]
    fn test_foreign_attributes_are_ignored() {
        let mine = BackendId::next();
        let other = BackendId::next();
        let visitor = Counting {
            backend: mine,
            equality: Cell::new(0),
            collection: Cell::new(0),
        };
        let expr = attr(other, "title").eq("a");
        assert_eq!(visitor.accept(&expr).unwrap(), 0);
    }

    #[test]
    fn test_unsupported_node_only_fails_on_owned_attribute() {
        let mine = BackendId::next();
        let other = BackendId::next();
        let visitor = Counting {
            backend: mine,
            equality: Cell::new(0),
            collection: Cell::new(0),
        };

        let case = |a: TranslatedRef| Expr::Case {
            operand: None,
            when_clauses: vec![(a.eq("x"), lit_int(1))],
            else_clause: None,
        };

        let err = visitor.accept(&case(attr(mine, "title"))).unwrap_err();
        assert_eq!(
            err,
            TranslationError::UnsupportedNode {
                node: "CASE",
                attribute: "title".into()
            }
        );
        assert_eq!(visitor.accept(&case(attr(other, "title"))).unwrap(), 0);
    }
}
