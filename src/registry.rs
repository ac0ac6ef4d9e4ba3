//! Models and the translation backends attached to them.
//!
//! A model may spread its translated attributes over several backends
//! (say, titles in a key-value table and bodies in a dedicated translations
//! table). [`ModelTranslations::where_clause`] lets each backend attach the
//! joins it needs and then filters once with the whole predicate.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ConfigError;
use crate::sql::{parse_predicate, Expr, ParseError, Query};
use crate::translation::{
    apply_join, invert_predicate, Backend, JoinRequirement, Locale, ModelRef, TranslationError,
    TranslationResult,
};

#[derive(Debug)]
pub struct ModelTranslations {
    model: ModelRef,
    backends: Vec<Box<dyn Backend>>,
}

impl ModelTranslations {
    pub fn new(model: ModelRef) -> Self {
        Self {
            model,
            backends: vec![],
        }
    }

    /// Attach a backend. Each attribute may be owned by one backend only.
    pub fn with_backend(mut self, backend: impl Backend + 'static) -> Result<Self, ConfigError> {
        if backend.model() != &self.model {
            return Err(ConfigError::InvalidConfig(format!(
                "{} backend is bound to '{}', not '{}'",
                backend.name(),
                backend.model().table,
                self.model.table
            )));
        }
        if backend.attributes().is_empty() {
            return Err(ConfigError::InvalidConfig(format!(
                "{} backend of '{}' translates no attributes",
                backend.name(),
                self.model.table
            )));
        }
        let attributes = backend.attributes();
        if let Some(attribute) = attributes.iter().enumerate().find_map(|(i, a)| {
            (attributes[..i].contains(a) || self.backend_for(a).is_some()).then_some(a)
        }) {
            return Err(ConfigError::DuplicateAttribute {
                model: self.model.table.clone(),
                attribute: attribute.clone(),
            });
        }
        self.backends.push(Box::new(backend));
        Ok(self)
    }

    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn Backend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    pub fn backend_for(&self, attribute: &str) -> Option<&dyn Backend> {
        self.backends()
            .find(|backend| backend.translates(attribute))
    }

    /// Predicate leaf for a translated attribute.
    pub fn attribute(&self, name: &str, locale: &Locale) -> TranslationResult<Expr> {
        match self.backend_for(name) {
            Some(backend) => backend.build_node(name, locale),
            None => Err(TranslationError::ForeignAttribute {
                model: self.model.table.clone(),
                attribute: name.into(),
            }),
        }
    }

    /// Parse a textual predicate; translated attribute names become
    /// references in `locale`, other identifiers stay columns.
    pub fn parse(&self, text: &str, locale: &Locale) -> Result<Expr, ParseError> {
        parse_predicate(text, |name| self.attribute(name, locale).ok())
    }

    /// `SELECT model.* FROM model`.
    pub fn base_query(&self) -> Query {
        self.model.base_query()
    }

    /// Every join the predicate needs, across all backends.
    pub fn plan(
        &self,
        predicate: &Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Vec<JoinRequirement>> {
        let mut plan = vec![];
        for backend in self.backends() {
            plan.extend(backend.plan_joins(predicate, locale, invert)?);
        }
        Ok(plan)
    }

    /// Attach the joins of every backend, then the predicate.
    pub fn where_clause(
        &self,
        query: Query,
        predicate: Expr,
        locale: &Locale,
        invert: bool,
    ) -> TranslationResult<Query> {
        let plan = self.plan(&predicate, locale, invert)?;
        Ok(self.apply_plan(query, plan, predicate, invert))
    }

    /// Attach already planned joins, then the predicate (negated when
    /// `invert`).
    pub fn apply_plan(
        &self,
        query: Query,
        plan: Vec<JoinRequirement>,
        predicate: Expr,
        invert: bool,
    ) -> Query {
        let query = plan
            .into_iter()
            .fold(query, |query, req| apply_join(query, req.target, req.kind));
        debug!(
            model = %self.model.table,
            invert,
            joins = query.joins.len(),
            "applied translation joins"
        );
        let predicate = if invert {
            invert_predicate(predicate)
        } else {
            predicate
        };
        query.filter(predicate)
    }
}

/// All configured models, by table name.
#[derive(Debug, Default)]
pub struct Registry {
    models: BTreeMap<String, ModelTranslations>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ModelTranslations) {
        self.models.insert(model.model().table.clone(), model);
    }

    pub fn get(&self, name: &str) -> Option<&ModelTranslations> {
        self.models.get(name)
    }

    pub fn model(&self, name: &str) -> Result<&ModelTranslations, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelTranslations> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
