//! TOML-based configuration for translayer.
//!
//! Declares which attributes of which models are translated, and by which
//! backend. Example configuration:
//! ```toml
//! [models.posts]
//! type_name = "Post"
//! primary_key = "id"
//!
//! [[models.posts.key_value]]
//! type = "string"
//! attributes = ["title"]
//!
//! [models.posts.key_value.columns]
//! owner_id = "record_id"
//!
//! [models.posts.table]
//! attributes = ["content", "subtitle"]
//! foreign_key = "post_id"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::registry::{ModelTranslations, Registry};
use crate::translation::{
    KeyValueBackend, KeyValueColumns, KeyValueType, ModelRef, TableBackend,
};

/// Error type for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unknown key-value type '{type_name}' on model '{model}' (expected string or text)")]
    UnknownKeyValueType { model: String, type_name: String },

    #[error("Attribute '{attribute}' of model '{model}' is declared more than once")]
    DuplicateAttribute { model: String, attribute: String },

    #[error("Model not found: {0}")]
    UnknownModel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Translated models, keyed by table name.
    pub models: BTreeMap<String, ModelSettings>,
}

/// One model and its translation backends.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    /// Owner type stored by key-value tables. Defaults to the classified
    /// table name (`posts` -> `Post`).
    pub type_name: Option<String>,

    /// Primary key of the model table. Defaults to `id`.
    pub primary_key: Option<String>,

    /// Key-value backends, one per value type.
    pub key_value: Vec<KeyValueSettings>,

    /// Dedicated translation table backend.
    pub table: Option<TableSettings>,
}

/// Key-value backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyValueSettings {
    /// `string` or `text`.
    #[serde(rename = "type")]
    pub value_type: String,

    pub attributes: Vec<String>,

    /// Shared table name. Defaults to `<type>_translations`.
    #[serde(default)]
    pub table: Option<String>,

    /// Column names of the shared table. Unset names keep their defaults
    /// (`key`, `value`, `locale`, `translatable_id`, `translatable_type`).
    #[serde(default)]
    pub columns: Option<KeyValueColumns>,
}

/// Table backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TableSettings {
    pub attributes: Vec<String>,

    /// Defaults to `<singular model>_translations`.
    #[serde(default)]
    pub table: Option<String>,

    /// Defaults to `<singular model>_id`.
    #[serde(default)]
    pub foreign_key: Option<String>,
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = content.parse()?;
        debug!(path = %path.display(), models = settings.models.len(), "loaded settings");
        Ok(settings)
    }

    /// Validate every model and build its backends.
    pub fn build_registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::new();
        for (name, model) in &self.models {
            registry.insert(model.build(name)?);
        }
        Ok(registry)
    }
}

impl ModelSettings {
    /// The model identity, with configured overrides applied.
    pub fn model_ref(&self, name: &str) -> ModelRef {
        let mut model = ModelRef::new(name);
        if let Some(type_name) = &self.type_name {
            model = model.with_type_name(type_name);
        }
        if let Some(primary_key) = &self.primary_key {
            model = model.with_primary_key(primary_key);
        }
        model
    }

    pub fn build(&self, name: &str) -> Result<ModelTranslations, ConfigError> {
        let model = self.model_ref(name);
        let mut translations = ModelTranslations::new(model.clone());

        for group in &self.key_value {
            let value_type = group.value_type.parse::<KeyValueType>().map_err(|type_name| {
                ConfigError::UnknownKeyValueType {
                    model: name.to_string(),
                    type_name,
                }
            })?;
            let mut backend =
                KeyValueBackend::new(model.clone(), value_type, group.attributes.clone());
            if let Some(table) = &group.table {
                backend = backend.with_table(table);
            }
            if let Some(columns) = &group.columns {
                backend = backend.with_columns(columns.clone());
            }
            translations = translations.with_backend(backend)?;
        }

        if let Some(group) = &self.table {
            let mut backend = TableBackend::new(model, group.attributes.clone());
            if let Some(table) = &group.table {
                backend = backend.with_table(table);
            }
            if let Some(foreign_key) = &group.foreign_key {
                backend = backend.with_foreign_key(foreign_key);
            }
            translations = translations.with_backend(backend)?;
        }

        if translations.backends().next().is_none() {
            return Err(ConfigError::InvalidConfig(format!(
                "model '{}' declares no translation backends",
                name
            )));
        }

        Ok(translations)
    }
}
