//! Graph decoder
//!
//! 1. Index the node list by id, rejecting an empty list and repeated ids.
//! 2. Check that both endpoints of every edge exist, whatever its relation. Then resolve the
//!    structural edges: a node may have only one parent, and an edge repeated verbatim
//!    counts once.
//! 3. Find the root: the single node nothing points to.
//! 4. Rebuild the tree from the root, children in edge order, and require that every node
//!    was reached (anything left over hangs on a cycle).
//! 5. Compare the `childrenIds`/`parentIds` caches with the edges and warn on mismatch.

use super::{GraphDocument, GraphNodeRecord};
use crate::error::FormatError;
use crate::formats::common::from_json;
use crate::tree::{assemble, LoomTree};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Decode graph JSON text.
pub fn decode(source: &str) -> Result<LoomTree, FormatError> {
    let document: GraphDocument = from_json(source)?;
    decode_document(&document)
}

/// Decode a typed graph document.
pub fn decode_document(document: &GraphDocument) -> Result<LoomTree, FormatError> {
    if document.nodes.is_empty() {
        return Err(FormatError::malformed("graph contains no nodes"));
    }

    let mut index: HashMap<&str, &GraphNodeRecord> = HashMap::with_capacity(document.nodes.len());
    for node in &document.nodes {
        if index.insert(node.id.as_str(), node).is_some() {
            return Err(FormatError::malformed(format!(
                "node id '{}' appears more than once",
                node.id
            )));
        }
    }

    let links = Links::resolve(document, &index)?;

    let roots: Vec<&str> = document
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .filter(|id| !links.parent_of.contains_key(id))
        .collect();
    let root = match roots.as_slice() {
        [root] => *root,
        _ => {
            return Err(FormatError::malformed(format!(
                "expected exactly one root (a node without an incoming parentId edge), found {}",
                roots.len()
            )))
        }
    };

    let mut visited = 0;
    let tree = build(root, &index, &links, &mut visited);
    if visited != document.nodes.len() {
        return Err(FormatError::malformed(format!(
            "{} node(s) are not reachable from root '{root}' (edge cycle)",
            document.nodes.len() - visited
        )));
    }

    check_caches(document, &links);

    debug!(
        nodes = visited,
        edges = links.edge_count,
        root = root,
        "decoded graph document"
    );
    Ok(tree)
}

/// Parent/child relationships taken from the structural edges.
struct Links<'a> {
    parent_of: HashMap<&'a str, &'a str>,
    children_of: HashMap<&'a str, Vec<&'a str>>,
    edge_count: usize,
}

impl<'a> Links<'a> {
    fn resolve(
        document: &'a GraphDocument,
        index: &HashMap<&str, &GraphNodeRecord>,
    ) -> Result<Self, FormatError> {
        let mut links = Links {
            parent_of: HashMap::new(),
            children_of: HashMap::new(),
            edge_count: 0,
        };

        for edge in &document.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !index.contains_key(endpoint.as_str()) {
                    return Err(FormatError::malformed(format!(
                        "edge '{}' -> '{}' ({}) references unknown node '{endpoint}'",
                        edge.from, edge.to, edge.relation
                    )));
                }
            }
        }

        for edge in document.edges.iter().filter(|edge| edge.is_structural()) {
            match links.parent_of.get(edge.to.as_str()) {
                Some(&parent) if parent == edge.from => {
                    debug!(from = %edge.from, to = %edge.to, "skipping repeated edge");
                    continue;
                }
                Some(&parent) => {
                    return Err(FormatError::malformed(format!(
                        "node '{}' has more than one parent ('{parent}' and '{}')",
                        edge.to, edge.from
                    )));
                }
                None => {}
            }

            links.parent_of.insert(&edge.to, &edge.from);
            links
                .children_of
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
            links.edge_count += 1;
        }

        Ok(links)
    }
}

fn build<'a>(
    root: &'a str,
    index: &HashMap<&str, &GraphNodeRecord>,
    links: &Links<'a>,
    visited: &mut usize,
) -> LoomTree {
    assemble(
        root,
        |id| {
            *visited += 1;
            let node = LoomTree {
                id: Some(id.to_string()),
                text: index[id].text.clone(),
                children: Vec::new(),
            };
            (node, links.children_of.get(id).cloned().unwrap_or_default())
        },
        LoomTree::add_child,
    )
}

fn check_caches(document: &GraphDocument, links: &Links<'_>) {
    for node in &document.nodes {
        let id = node.id.as_str();
        let from_edges: HashSet<&str> = links
            .children_of
            .get(id)
            .map(|children| children.iter().copied().collect())
            .unwrap_or_default();
        let cached: HashSet<&str> = node.children_ids.iter().map(String::as_str).collect();
        if cached != from_edges {
            warn!(node = id, "childrenIds disagree with edges; using edges");
        }

        let parent_from_edges: HashSet<&str> = links.parent_of.get(id).copied().into_iter().collect();
        let cached_parents: HashSet<&str> = node.parent_ids.iter().map(String::as_str).collect();
        if cached_parents != parent_from_edges {
            warn!(node = id, "parentIds disagree with edges; using edges");
        }
    }
}
