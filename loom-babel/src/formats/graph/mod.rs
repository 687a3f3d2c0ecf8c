//! Graph format implementation
//!
//! The graph format keeps nodes and relationships apart: a `nodes` list with per-node
//! metadata and an `edges` list of `{from, to, relation}` entries.
//!
//! ```json
//! {
//!   "nodes": [
//!     {"id": "r", "text": "Once", "childrenIds": ["c"], "parentIds": [], "group": "normal",
//!      "visible": true, "tags": [], "createdAt": 1704067200000, "lastVisited": 1704067200000,
//!      "lastUpdated": 1704067200000, "logprobs": null, "generationSettings": null, "label": ""},
//!     {"id": "c", "text": " upon", "childrenIds": [], "parentIds": ["r"], …}
//!   ],
//!   "edges": [{"from": "r", "to": "c", "relation": "parentId"}],
//!   "name": "graph_1",
//!   "pathNodes": ["r"],
//!   "focusedId": "r"
//! }
//! ```
//!
//! # Source of truth
//!
//! Parent/child relationships are stated twice: once in `edges` and once in the per-node
//! `childrenIds`/`parentIds` lists. The edge list is canonical. The id lists are written as
//! caches for readers that want them, but decoding never attaches a child because of them,
//! so a relationship stated in both places yields exactly one child. When the caches
//! disagree with the edges a warning is logged and the edges win.
//!
//! Only edges whose `relation` is `"parentId"` are structural. Other relations do not shape the
//! tree, but their endpoints must still name nodes in the document.
//!
//! # Root
//!
//! The root is the unique node without an incoming structural edge. Its position in `nodes`
//! does not matter.
//!
//! # Identity
//!
//! Node ids are taken from the tree unchanged. Encoding therefore requires every node to
//! carry an id and ids to be unique; otherwise the edge list could not be resolved back to
//! the same tree.

mod parser;
mod serializer;

pub use parser::{decode, decode_document};
pub use serializer::{encode, encode_document, encode_document_at};

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::{to_json, JsonOptions};
use crate::tree::LoomTree;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Name given to encoded graphs unless overridden.
pub const DEFAULT_GRAPH_NAME: &str = "graph_1";

/// Relation tag of structural edges.
pub const PARENT_RELATION: &str = "parentId";

const NORMAL_GROUP: &str = "normal";

/// Top-level graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub nodes: Vec<GraphNodeRecord>,
    #[serde(default)]
    pub edges: Vec<GraphEdgeRecord>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path_nodes: Vec<String>,
    #[serde(default)]
    pub focused_id: Option<String>,
}

/// A node entry with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub children_ids: Vec<String>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    #[serde(default = "normal_group")]
    pub group: String,
    #[serde(default = "visible")]
    pub visible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub last_visited: Option<i64>,
    #[serde(default)]
    pub last_updated: Option<i64>,
    #[serde(default)]
    pub logprobs: Option<Value>,
    #[serde(default)]
    pub generation_settings: Option<Value>,
    #[serde(default)]
    pub label: String,
}

/// A directed relationship between two node entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default = "parent_relation")]
    pub relation: String,
}

fn normal_group() -> String {
    NORMAL_GROUP.to_string()
}

fn visible() -> bool {
    true
}

fn parent_relation() -> String {
    PARENT_RELATION.to_string()
}

impl GraphEdgeRecord {
    pub fn parent(from: impl Into<String>, to: impl Into<String>) -> Self {
        GraphEdgeRecord {
            from: from.into(),
            to: to.into(),
            relation: parent_relation(),
        }
    }

    pub fn is_structural(&self) -> bool {
        self.relation == PARENT_RELATION
    }
}

/// Format implementation for the graph format
pub struct GraphFormat;

impl Format for GraphFormat {
    fn name(&self) -> &str {
        "graph"
    }

    fn description(&self) -> &str {
        "Node list and edge list with per-node metadata"
    }

    fn file_extensions(&self) -> &[&str] {
        &["graph"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn sniff(&self, source: &Value) -> bool {
        source.get("nodes").is_some_and(Value::is_array)
            && source.get("edges").is_some_and(Value::is_array)
    }

    fn parse(&self, source: &str) -> Result<LoomTree, FormatError> {
        decode(source)
    }

    fn serialize(&self, tree: &LoomTree) -> Result<String, FormatError> {
        encode(tree)
    }

    /// Accepts `pretty` and `name` (the graph name, defaults to [`DEFAULT_GRAPH_NAME`]).
    fn serialize_with_options(
        &self,
        tree: &LoomTree,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let json_options = JsonOptions::from_params(self.name(), options, &["name"])?;
        let name = options
            .get("name")
            .map(String::as_str)
            .unwrap_or(DEFAULT_GRAPH_NAME);
        let document = encode_document_at(tree, name, Utc::now())?;
        to_json(&document, json_options.pretty)
    }
}
