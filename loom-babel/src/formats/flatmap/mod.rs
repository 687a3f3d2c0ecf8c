//! Flat-map format implementation
//!
//! The flat-map format stores every node as a record in one JSON object keyed by node id.
//! Structure is carried by each record's `parentId`; the root has `parentId: null`.
//!
//! ```json
//! {
//!   "hoisted": [],
//!   "nodes": {
//!     "5f0c…": {"text": "Once", "parentId": null, "unread": false, "collapsed": false,
//!                "bookmarked": false, "color": null, "lastVisited": 1704067200000,
//!                "children": ["9a1e…"]},
//!     "9a1e…": {"text": " upon", "parentId": "5f0c…", …, "children": []}
//!   },
//!   "current": "5f0c…",
//!   "generating": null
//! }
//! ```
//!
//! # Identity
//!
//! Encoding re-keys the tree: every node receives a freshly generated UUID and the ids of
//! the input tree are dropped. Decoding uses the map keys as ids.
//!
//! # Ordering
//!
//! Decoding rebuilds children purely from `parentId` links, scanning `nodes` in map order;
//! the records' own `children` arrays are not consulted. `nodes` is an [`IndexMap`] and
//! serde_json is built with `preserve_order`, so map order is the key order of the JSON text.
//! The encoder writes records in pre-order, which makes `decode(encode(tree))` keep the
//! original child order. Documents written by tools that reorder keys decode in their key
//! order instead.
//!
//! # Several roots
//!
//! When more than one record has `parentId: null`, the decoder hangs all of them under a
//! synthetic root with a fresh id and empty text, in discovery order.

mod parser;
mod serializer;

pub use parser::{decode, decode_document, decode_value};
pub use serializer::{encode, encode_at};

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::{to_json, JsonOptions};
use crate::tree::LoomTree;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Top-level flat-map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatMapDocument {
    #[serde(default)]
    pub hoisted: Vec<String>,
    pub nodes: IndexMap<String, FlatRecord>,
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub generating: Option<Value>,
}

/// One node record, keyed by its id in [`FlatMapDocument::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub text: String,
    /// Required, but may be `null` (root records).
    #[serde(deserialize_with = "nullable")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub bookmarked: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub last_visited: Option<i64>,
    #[serde(default)]
    pub children: Vec<String>,
}

// A plain `Option` field would make `parentId` optional; routing it through a
// `deserialize_with` keeps it required while still accepting `null`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Format implementation for the flat-map format
pub struct FlatMapFormat;

impl Format for FlatMapFormat {
    fn name(&self) -> &str {
        "flatmap"
    }

    fn description(&self) -> &str {
        "Map of node records linked by parentId"
    }

    fn file_extensions(&self) -> &[&str] {
        &["flatmap"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn sniff(&self, source: &Value) -> bool {
        source.get("nodes").is_some_and(Value::is_object)
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
