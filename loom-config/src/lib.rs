//! Shared configuration loader for the loom tools.
//!
//! `defaults/loom.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`LoomConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/loom.default.toml");

/// Top-level configuration consumed by loom applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LoomConfig {
    pub convert: ConvertConfig,
    pub inspect: InspectConfig,
    pub log: LogConfig,
}

/// Output knobs for `convert`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub pretty: bool,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub name: String,
}

/// Controls the outline printed by `inspect`.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_ids: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl LoomConfig {
    /// Serializer options for `format`, in the key/value shape the format registry takes.
    ///
    /// Formats this crate knows nothing about get no options.
    pub fn format_options(&self, format: &str) -> HashMap<String, String> {
        let mut options = HashMap::new();
        match format {
            "nested" | "flatmap" => {
                options.insert("pretty".to_string(), self.convert.pretty.to_string());
            }
            "graph" => {
                options.insert("pretty".to_string(), self.convert.pretty.to_string());
                options.insert("name".to_string(), self.convert.graph.name.clone());
            }
            "treeviz" => {
                options.insert("show-ids".to_string(), self.inspect.show_ids.to_string());
            }
            _ => {}
        }
        options
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LoomConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LoomConfig, ConfigError> {
    Loader::new().build()
}
