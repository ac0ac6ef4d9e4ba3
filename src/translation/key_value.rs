//! Key-value translations: one shared table holds every translated value,
//! keyed by attribute name, locale and owner.
//!
//! Each (attribute, locale) pair gets its own aliased join on that table,
//! so a predicate over `title` and `subtitle` joins it twice.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sql::{table_col, Expr, ExprExt, TableRef};

use super::error::TranslationResult;
use super::visitor::Visitor;
use super::{
    unknown_attribute, Backend, BackendId, JoinKind, JoinRequirement, JoinTarget, Locale,
    ModelRef, TranslatedRef,
};

/// Join kind per attribute name.
pub type JoinMap = BTreeMap<String, JoinKind>;

/// Which shared table stores the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValueType {
    String,
    Text,
}

impl KeyValueType {
    pub fn name(&self) -> &'static str {
        match self {
            KeyValueType::String => "string",
            KeyValueType::Text => "text",
        }
    }

    /// `string_translations` / `text_translations`.
    pub fn default_table(&self) -> String {
        format!("{}_translations", self.name())
    }
}

impl FromStr for KeyValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(KeyValueType::String),
            "text" => Ok(KeyValueType::Text),
            other => Err(other.to_string()),
        }
    }
}

/// Column names of a key-value translation table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyValueColumns {
    pub key: String,
    pub value: String,
    pub locale: String,
    pub owner_id: String,
    pub owner_type: String,
}

impl Default for KeyValueColumns {
    fn default() -> Self {
        Self {
            key: "key".into(),
            value: "value".into(),
            locale: "locale".into(),
            owner_id: "translatable_id".into(),
            owner_type: "translatable_type".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyValueBackend {
    id: BackendId,
    model: ModelRef,
    value_type: KeyValueType,
    table: String,
    columns: KeyValueColumns,
    attributes: Vec<String>,
}

impl KeyValueBackend {
    pub fn new(model: ModelRef, value_type: KeyValueType, attributes: Vec<String>) -> Self {
        Self {
            id: BackendId::next(),
            model,
            value_type,
            table: value_type.default_table(),
            columns: KeyValueColumns::default(),
            attributes,
        }
    }

    /// Store values in `table` instead of the type's default table.
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_columns(mut self, columns: KeyValueColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn value_type(&self) -> KeyValueType {
        self.value_type
    }

    pub fn columns(&self) -> &KeyValueColumns {
        &self.columns
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Alias of the join serving `attribute` in `locale`, e.g.
    /// `post_title_en_string_translations`.
    pub fn alias(&self, attribute: &str, locale: &Locale) -> String {
        format!(
            "{}_{}_{}_{}",
            self.model.singular,
            attribute,
            locale.normalized(),
            self.table
        )
    }

    /// The aliased join of the shared table for one attribute and locale.
    pub fn join_target(&self, attribute: &str, locale: &Locale) -> JoinTarget {
        let alias = self.alias(attribute, locale);
        let cols = &self.columns;
        let on = table_col(&alias, &cols.owner_id)
            .eq(table_col(&self.model.table, &self.model.primary_key))
            .and(table_col(&alias, &cols.locale).eq(locale.as_str()))
            .and(table_col(&alias, &cols.key).eq(attribute))
            .and(table_col(&alias, &cols.owner_type).eq(self.model.type_name.as_str()));
        JoinTarget {
            table: TableRef::new(&self.table).with_alias(&alias),
            on,
        }
    }

    /// Join kind per attribute the predicate mentions.
    pub fn infer(&self, predicate: &Expr, locale: &Locale) -> TranslationResult<JoinMap> {
        KeyValueVisitor {
            backend: self.id,
            locale,
        }
        .accept(predicate)
    }
}

impl Backend for KeyValueBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn name(&self) -> &'static str {
        "key_value"
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
            table: self.alias(attribute, locale),
            column: self.columns.value.clone(),
        }))
    }

    fn plan_joins(
        &self,
        predicate: &Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Vec<JoinRequirement>> {
        let joins = self.infer(predicate, locale)?;
        debug!(
            model = %self.model.table,
            table = %self.table,
            %locale,
            ?joins,
            "inferred key-value joins"
        );
        Ok(joins
            .into_iter()
            .map(|(attribute, kind)| JoinRequirement {
                target: self.join_target(&attribute, locale),
                attribute: Some(attribute),
                kind: kind.for_predicate(invert),
            })
            .collect())
    }
}

/// Per-attribute join inference.
struct KeyValueVisitor<'a> {
    backend: BackendId,
    locale: &'a Locale,
}

fn merge_maps(mut left: JoinMap, right: JoinMap) -> JoinMap {
    for (attribute, kind) in right {
        left.entry(attribute)
            .and_modify(|existing| *existing = existing.merge(kind))
            .or_insert(kind);
    }
    left
}

fn all_outer(mut joins: JoinMap) -> JoinMap {
    joins.values_mut().for_each(|kind| *kind = JoinKind::Outer);
    joins
}

impl Visitor for KeyValueVisitor<'_> {
    type Output = JoinMap;

    fn owns(&self, attr: &TranslatedRef) -> bool {
        attr.backend == self.backend && &attr.locale == self.locale
    }

    fn visit_attribute(&self, attr: &TranslatedRef) -> JoinMap {
        JoinMap::from([(attr.attribute.clone(), JoinKind::Inner)])
    }

    fn combine(&self, left: JoinMap, right: JoinMap) -> JoinMap {
        merge_maps(left, right)
    }

    /// Comparing against NULL is satisfied by a missing row.
    fn visit_equality(&self, operands: &[&Expr], null: bool) -> TranslationResult<JoinMap> {
        let joins = self.visit_collection(operands)?;
        Ok(if null { all_outer(joins) } else { joins })
    }

    /// Either branch may hold without the other's row, so every attribute
    /// under an OR is joined outer.
    fn visit_or(&self, left: &Expr, right: &Expr) -> TranslationResult<JoinMap> {
        let joins = merge_maps(self.accept(left)?, self.accept(right)?);
        Ok(all_outer(joins))
    }
}
