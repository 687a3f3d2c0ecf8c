//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name, detected from a filename or sniffed
//! from the content itself.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::json_outline;
use crate::tree::LoomTree;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Registry of loom tree formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let graph = registry.convert(&nested_json, "nested", "graph", &HashMap::new())?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect a parseable format from the filename's extension
    ///
    /// A trailing `.json` is looked through, so both `story.graph` and `story.graph.json`
    /// resolve to `graph`. Output-only formats never match: a `.tree` file is left to
    /// content sniffing.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let path = Path::new(filename);
        let mut extension = path.extension().and_then(|ext| ext.to_str())?;
        if extension == "json" {
            extension = path
                .file_stem()
                .map(Path::new)
                .and_then(|stem| stem.extension())
                .and_then(|ext| ext.to_str())?;
        }

        self.formats
            .values()
            .find(|format| {
                format.supports_parsing() && format.file_extensions().contains(&extension)
            })
            .map(|format| format.name().to_string())
    }

    /// Detect a parseable format by looking at the shape of the JSON source.
    ///
    /// Only the kinds of the top-level members are read. Returns None when the source is not
    /// a JSON object or no format recognises it.
    pub fn detect_format_from_source(&self, source: &str) -> Option<String> {
        let value = json_outline(source)?;
        let detected = self
            .list_formats()
            .into_iter()
            .find(|name| self.formats[name].supports_parsing() && self.formats[name].sniff(&value));
        debug!(format = ?detected, "sniffed source format");
        detected
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<LoomTree, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source)
    }

    /// Serialize a tree using the specified format
    pub fn serialize(&self, tree: &LoomTree, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(tree, format, &HashMap::new())
    }

    /// Serialize a tree using the specified format and options
    pub fn serialize_with_options(
        &self,
        tree: &LoomTree,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize_with_options(tree, options)
    }

    /// Parse with one format and serialize with another.
    pub fn convert(
        &self,
        source: &str,
        from: &str,
        to: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        // Fail on an unknown target before doing any work.
        self.get(to)?;
        let tree = self.parse(source, from)?;
        debug!(from, to, nodes = tree.node_count(), "converting");
        self.serialize_with_options(&tree, to, options)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::nested::NestedFormat);
        registry.register(crate::formats::flatmap::FlatMapFormat);
        registry.register(crate::formats::graph::GraphFormat);
        registry.register(crate::formats::treeviz::TreevizFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
