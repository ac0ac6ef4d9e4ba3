//! Configuration module for translayer.
//!
//! Loads the translated-model declarations and builds the backend registry.

mod settings;

pub use settings::{ConfigError, KeyValueSettings, ModelSettings, Settings, TableSettings};
