//! Functional conversion helpers
//!
//! Thin wrappers over the default [`FormatRegistry`] for callers that just want
//! "this text, from that format, into this one" without managing a registry.

use crate::error::FormatError;
use crate::registry::FormatRegistry;
use crate::tree::LoomTree;
use std::collections::HashMap;

/// Convert `source` between two registered formats using default options.
///
/// # Example
///
/// ```ignore
/// let flat = loom_babel::transforms::convert(&nested_json, "nested", "flatmap")?;
/// ```
pub fn convert(source: &str, from: &str, to: &str) -> Result<String, FormatError> {
    FormatRegistry::default().convert(source, from, to, &HashMap::new())
}

/// Work out the format of `source`: by filename first, then by sniffing the content.
pub fn detect_format(
    registry: &FormatRegistry,
    filename: Option<&str>,
    source: &str,
) -> Result<String, FormatError> {
    filename
        .and_then(|name| registry.detect_format_from_filename(name))
        .or_else(|| registry.detect_format_from_source(source))
        .ok_or_else(|| {
            FormatError::MalformedInput(match filename {
                Some(name) => format!("could not detect the format of '{name}'"),
                None => "could not detect the format of the input".to_string(),
            })
        })
}

/// Parse `source`, detecting its format when `from` is not given.
///
/// Returns the format used along with the tree.
pub fn parse_any(
    registry: &FormatRegistry,
    source: &str,
    from: Option<&str>,
    filename: Option<&str>,
) -> Result<(String, LoomTree), FormatError> {
    let format = match from {
        Some(name) => name.to_string(),
        None => detect_format(registry, filename, source)?,
    };
    let tree = registry.parse(source, &format)?;
    Ok((format, tree))
}
