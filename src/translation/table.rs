//! Table translations: a dedicated `<model>_translations` table with one row
//! per (record, locale) and one column per translated attribute.
//!
//! All attributes of a locale share a single join, so the inference
//! produces one kind for the whole predicate.

use tracing::debug;

use crate::sql::{table_col, Expr, ExprExt, TableRef};

use super::error::TranslationResult;
use super::visitor::{reject_unsupported, Visitor};
use super::{
    unknown_attribute, Backend, BackendId, JoinKind, JoinRequirement, JoinTarget, Locale,
    ModelRef, TranslatedRef,
};

#[derive(Debug, Clone)]
pub struct TableBackend {
    id: BackendId,
    model: ModelRef,
    table: String,
    foreign_key: String,
    locale_column: String,
    attributes: Vec<String>,
}

impl TableBackend {
    /// Backend over `<singular>_translations` with `<singular>_id` as the
    /// foreign key.
    pub fn new(model: ModelRef, attributes: Vec<String>) -> Self {
        let table = format!("{}_translations", model.singular);
        let foreign_key = format!("{}_id", model.singular);
        Self {
            id: BackendId::next(),
            model,
            table,
            foreign_key,
            locale_column: "locale".into(),
            attributes,
        }
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: &str) -> Self {
        self.foreign_key = foreign_key.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// `post_translations_en`.
    pub fn alias(&self, locale: &Locale) -> String {
        format!("{}_{}", self.table, locale.normalized())
    }

    pub fn join_target(&self, locale: &Locale) -> JoinTarget {
        let alias = self.alias(locale);
        let on = table_col(&alias, &self.foreign_key)
            .eq(table_col(&self.model.table, &self.model.primary_key))
            .and(table_col(&alias, &self.locale_column).eq(locale.as_str()));
        JoinTarget {
            table: TableRef::new(&self.table).with_alias(&alias),
            on,
        }
    }

    /// Join kind for the predicate, `None` when it needs no join.
    pub fn infer(&self, predicate: &Expr, locale: &Locale) -> TranslationResult<Option<JoinKind>> {
        TableVisitor {
            backend: self.id,
            locale,
        }
        .accept(predicate)
    }
}

impl Backend for TableBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn name(&self) -> &'static str {
        "table"
    }

    fn model(&self) -> &ModelRef {
        &self.model
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn build_node(&self, attribute: &str, locale: &Locale) -> TranslationResult<Expr> {
        if !self.translates(attribute) {
            return Err(unknown_attribute(self, attribute));
        }
        Ok(Expr::Translated(TranslatedRef {
            backend: self.id,
            attribute: attribute.into(),
            locale: locale.clone(),
            table: self.alias(locale),
            column: attribute.into(),
        }))
    }

    fn plan_joins(
        &self,
        predicate: &Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Vec<JoinRequirement>> {
        let kind = self.infer(predicate, locale)?;
        debug!(
            model = %self.model.table,
            table = %self.table,
            %locale,
            ?kind,
            "inferred table join"
        );
        Ok(kind
            .map(|kind| JoinRequirement {
                attribute: None,
                target: self.join_target(locale),
                kind: kind.for_predicate(invert),
            })
            .into_iter()
            .collect())
    }
}

/// Whole-predicate join inference.
struct TableVisitor<'a> {
    backend: BackendId,
    locale: &'a Locale,
}

impl Visitor for TableVisitor<'_> {
    type Output = Option<JoinKind>;

    fn owns(&self, attr: &TranslatedRef) -> bool {
        attr.backend == self.backend && &attr.locale == self.locale
    }

    /// A bare reference says nothing about row existence.
    fn visit_attribute(&self, _: &TranslatedRef) -> Option<JoinKind> {
        Some(JoinKind::Outer)
    }

    fn combine(&self, left: Option<JoinKind>, right: Option<JoinKind>) -> Option<JoinKind> {
        match (left, right) {
            (Some(l), Some(r)) => Some(l.merge(r)),
            (l, r) => l.or(r),
        }
    }

    fn visit_equality(
        &self,
        operands: &[&Expr],
        null: bool,
    ) -> TranslationResult<Option<JoinKind>> {
        let mut touched = false;
        for operand in operands {
            touched |= self.accept(operand)?.is_some();
        }
        Ok(touched.then_some(if null {
            JoinKind::Outer
        } else {
            JoinKind::Inner
        }))
    }

    fn visit_or(&self, left: &Expr, right: &Expr) -> TranslationResult<Option<JoinKind>> {
        let left = self.accept(left)?;
        let right = self.accept(right)?;
        Ok(left.or(right).map(|_| JoinKind::Outer))
    }

    /// Any `Outer` child decides the whole collection. The remaining
    /// children are only checked for unsupported nodes.
    fn visit_collection(&self, children: &[&Expr]) -> TranslationResult<Option<JoinKind>> {
        let mut found = None;
        for (i, child) in children.iter().enumerate() {
            match self.accept(child)? {
                Some(JoinKind::Outer) => {
                    for rest in &children[i + 1..] {
                        reject_unsupported(self, rest)?;
                    }
                    return Ok(Some(JoinKind::Outer));
                }
                Some(kind) => {
                    found.get_or_insert(kind);
                }
                None => {}
            }
        }
        Ok(found)
    }
}
