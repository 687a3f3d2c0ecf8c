//! Flat-map encoder
//!
//! One pre-order pass over the tree. Each node gets a generated id and a record inserted
//! before any of its descendants, so map order is pre-order. The ids of the nodes on the
//! path from the root are kept on a stack indexed by depth: the entry one level up is the
//! parent, which receives the new id in its `children` list and is named in `parentId`.
//!
//! The root is the only record with `parentId: null`.

use super::{FlatMapDocument, FlatRecord};
use crate::formats::common::{epoch_millis, generate_id};
use crate::tree::LoomTree;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Encode a tree as a flat-map document, stamping records with the current time.
pub fn encode(tree: &LoomTree) -> FlatMapDocument {
    encode_at(tree, Utc::now())
}

/// Encode a tree as a flat-map document, using `captured_at` for every `lastVisited`.
pub fn encode_at(tree: &LoomTree, captured_at: DateTime<Utc>) -> FlatMapDocument {
    let last_visited = epoch_millis(captured_at);
    let mut nodes: IndexMap<String, FlatRecord> = IndexMap::with_capacity(tree.node_count());
    let mut path: Vec<String> = Vec::new();

    for (depth, node) in tree.walk() {
        let id = generate_id();
        trace!(id = %id, original = ?node.id, "assigned flat-map id");

        path.truncate(depth);
        let parent_id = path.last().cloned();
        if let Some(parent) = parent_id.as_ref().and_then(|parent| nodes.get_mut(parent)) {
            parent.children.push(id.clone());
        }

        nodes.insert(
            id.clone(),
            FlatRecord {
                text: node.text.clone(),
                parent_id,
                unread: false,
                collapsed: false,
                bookmarked: false,
                color: None,
                last_visited: Some(last_visited),
                children: Vec::with_capacity(node.children.len()),
            },
        );
        path.push(id);
    }

    let root = path.into_iter().next().unwrap_or_default();
    debug!(nodes = nodes.len(), root = %root, "encoded flat-map document");
    FlatMapDocument {
        hoisted: Vec::new(),
        nodes,
        current: Some(root),
        generating: None,
    }
}
