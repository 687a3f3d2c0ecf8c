//! Graph encoder
//!
//! One pre-order pass from the root emits the node entries and, for every parent/child
//! pair, one structural edge plus the matching `childrenIds`/`parentIds` cache entries.
//! Because all three come from the same traversal they always agree. The ids on the path
//! from the root sit on a stack indexed by depth, so the parent is always one entry up.

use super::{
    GraphDocument, GraphEdgeRecord, GraphNodeRecord, DEFAULT_GRAPH_NAME, NORMAL_GROUP,
};
use crate::error::FormatError;
use crate::formats::common::{epoch_millis, to_json};
use crate::tree::LoomTree;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Encode a tree as compact graph JSON.
pub fn encode(tree: &LoomTree) -> Result<String, FormatError> {
    let document = encode_document(tree)?;
    to_json(&document, false)
}

/// Encode a tree as a graph document named [`DEFAULT_GRAPH_NAME`], stamped with the current time.
pub fn encode_document(tree: &LoomTree) -> Result<GraphDocument, FormatError> {
    encode_document_at(tree, DEFAULT_GRAPH_NAME, Utc::now())
}

/// Encode a tree as a graph document.
///
/// Fails when a node has no id or an id occurs twice.
pub fn encode_document_at(
    tree: &LoomTree,
    name: &str,
    captured_at: DateTime<Utc>,
) -> Result<GraphDocument, FormatError> {
    validate_ids(tree)?;

    let mut encoder = Encoder {
        timestamp: epoch_millis(captured_at),
        nodes: Vec::with_capacity(tree.node_count()),
        edges: Vec::with_capacity(tree.node_count().saturating_sub(1)),
    };
    let mut path: Vec<String> = Vec::new();
    for (depth, node) in tree.walk() {
        path.truncate(depth);
        let id = encoder.visit(node, path.last().map(String::as_str));
        path.push(id);
    }
    let root_id = path.into_iter().next().unwrap_or_default();

    debug!(
        nodes = encoder.nodes.len(),
        edges = encoder.edges.len(),
        "encoded graph document"
    );

    Ok(GraphDocument {
        nodes: encoder.nodes,
        edges: encoder.edges,
        name: name.to_string(),
        path_nodes: vec![root_id.clone()],
        focused_id: Some(root_id),
    })
}

fn validate_ids(tree: &LoomTree) -> Result<(), FormatError> {
    if let Some((_, node)) = tree.walk().find(|(_, node)| node.id.is_none()) {
        return Err(FormatError::SerializationError(format!(
            "graph format needs an id on every node, but node with text {:?} has none",
            truncate(&node.text)
        )));
    }
    let duplicates = tree.duplicate_ids();
    if !duplicates.is_empty() {
        return Err(FormatError::SerializationError(format!(
            "graph format needs unique node ids, but these repeat: {}",
            duplicates.join(", ")
        )));
    }
    Ok(())
}

fn truncate(text: &str) -> String {
    text.chars().take(30).collect()
}

struct Encoder {
    timestamp: i64,
    nodes: Vec<GraphNodeRecord>,
    edges: Vec<GraphEdgeRecord>,
}

impl Encoder {
    /// Emits `node` and the edge from its parent, returning the node's id.
    fn visit(&mut self, node: &LoomTree, parent: Option<&str>) -> String {
        let id = node.id.clone().unwrap_or_default();
        if let Some(parent) = parent {
            self.edges.push(GraphEdgeRecord::parent(parent, id.clone()));
        }
        self.nodes.push(GraphNodeRecord {
            id: id.clone(),
            text: node.text.clone(),
            children_ids: node
                .children
                .iter()
                .map(|child| child.id.clone().unwrap_or_default())
                .collect(),
            parent_ids: parent.map(str::to_string).into_iter().collect(),
            group: NORMAL_GROUP.to_string(),
            visible: true,
            tags: Vec::new(),
            created_at: Some(self.timestamp),
            last_visited: Some(self.timestamp),
            last_updated: Some(self.timestamp),
            logprobs: None,
            generation_settings: None,
            label: String::new(),
        });
        id
    }
}
