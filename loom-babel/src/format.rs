//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing loom trees.

use crate::error::FormatError;
use crate::tree::LoomTree;
use std::collections::HashMap;

/// Trait for loom tree formats
///
/// Implementors provide bidirectional conversion between a string representation and
/// [`LoomTree`]. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<LoomTree, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "nested", "flatmap", "graph")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → LoomTree)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (LoomTree → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Whether `source` looks like a document of this format.
    ///
    /// This is a cheap structural check used for auto-detection, not a validation.
    fn sniff(&self, _source: &serde_json::Value) -> bool {
        false
    }

    /// Parse source text into a tree
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<LoomTree, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a tree into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _tree: &LoomTree) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize a tree, optionally using extra parameters.
    ///
    /// Formats without options can rely on the default implementation, which delegates
    /// to [`Format::serialize`] and rejects any parameter.
    fn serialize_with_options(
        &self,
        tree: &LoomTree,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(tree)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
