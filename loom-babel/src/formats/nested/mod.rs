//! Nested format implementation
//!
//! The nested format mirrors the tree directly: every node is an object carrying its own
//! children, and the whole tree is wrapped in a `root` key.
//!
//! ```json
//! {"root": {"id": "a", "text": "Once", "children": [
//!     {"id": "b", "text": " upon", "children": []}
//! ]}}
//! ```
//!
//! This is the only lossless format: ids, texts and child order all survive a round trip.
//! A missing or `null` id decodes to `None`; numeric ids are accepted and kept as their
//! decimal text. `text` and `children` are required.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::{from_deep_json, from_deep_value, to_json, JsonOptions};
use crate::tree::{assemble, LoomTree};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Top-level nested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedDocument {
    pub root: NestedNode,
}

/// One node of the nested format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedNode {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    pub text: String,
    pub children: Vec<NestedNode>,
}

impl Drop for NestedNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "invalid id {other}, expected a string or a number"
        ))),
    }
}

/// Encode a tree as a nested document.
pub fn encode(tree: &LoomTree) -> NestedDocument {
    debug!(nodes = tree.node_count(), "encoding nested document");
    NestedDocument {
        root: encode_node(tree),
    }
}

fn encode_node(tree: &LoomTree) -> NestedNode {
    assemble(
        tree,
        |node| {
            let record = NestedNode {
                id: node.id.clone(),
                text: node.text.clone(),
                children: Vec::with_capacity(node.children.len()),
            };
            (record, node.children.iter().collect())
        },
        |parent: &mut NestedNode, child| parent.children.push(child),
    )
}

/// Decode nested JSON text.
pub fn decode(source: &str) -> Result<LoomTree, FormatError> {
    let document: NestedDocument = from_deep_json(source)?;
    Ok(decode_document(document))
}

/// Decode an already parsed JSON value.
pub fn decode_value(value: Value) -> Result<LoomTree, FormatError> {
    let document: NestedDocument = from_deep_value(value)?;
    Ok(decode_document(document))
}

/// Decode a typed nested document. Cannot fail: the types already enforce the shape.
pub fn decode_document(document: NestedDocument) -> LoomTree {
    let tree = assemble(
        document.root,
        |mut node: NestedNode| {
            let children = std::mem::take(&mut node.children);
            let tree = LoomTree {
                id: node.id.take(),
                text: std::mem::take(&mut node.text),
                children: Vec::with_capacity(children.len()),
            };
            (tree, children)
        },
        LoomTree::add_child,
    );
    debug!(nodes = tree.node_count(), "decoded nested document");
    tree
}

/// Format implementation for the nested format
pub struct NestedFormat;

impl Format for NestedFormat {
    fn name(&self) -> &str {
        "nested"
    }

    fn description(&self) -> &str {
        "Recursive {id, text, children} objects under a root key"
    }

    fn file_extensions(&self) -> &[&str] {
        &["nested"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn sniff(&self, source: &Value) -> bool {
        source.get("root").is_some_and(Value::is_object)
    }

    fn parse(&self, source: &str) -> Result<LoomTree, FormatError> {
        decode(source)
    }

    fn serialize(&self, tree: &LoomTree) -> Result<String, FormatError> {
        self.serialize_with_options(tree, &HashMap::new())
    }

    fn serialize_with_options(
        &self,
        tree: &LoomTree,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let options = JsonOptions::from_params(self.name(), options, &[])?;
        to_json(&encode(tree), options.pretty)
    }
}
