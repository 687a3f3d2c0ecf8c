//! Flat-map decoder
//!
//! 1. Reject records whose `parentId` names a node that does not exist. Such a node could
//!    never be reached, and dropping it silently would lose data.
//! 2. Partition the records, in map order, into roots (`parentId: null`) and per-parent
//!    child lists.
//! 3. Rebuild each root's subtree from the child lists.
//! 4. Every record must have been reached; leftovers can only sit on a `parentId` cycle.
//! 5. One root is returned as is, several are gathered under a synthetic root.

use super::FlatMapDocument;
use crate::error::FormatError;
use crate::formats::common::{from_json, generate_id};
use crate::tree::{assemble, LoomTree};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Decode flat-map JSON text.
pub fn decode(source: &str) -> Result<LoomTree, FormatError> {
    let document: FlatMapDocument = from_json(source)?;
    decode_document(document)
}

/// Decode an already parsed JSON value.
pub fn decode_value(value: Value) -> Result<LoomTree, FormatError> {
    let document: FlatMapDocument =
        serde_json::from_value(value).map_err(FormatError::from_decode)?;
    decode_document(document)
}

/// Decode a typed flat-map document.
pub fn decode_document(document: FlatMapDocument) -> Result<LoomTree, FormatError> {
    let nodes = &document.nodes;
    if nodes.is_empty() {
        return Err(FormatError::malformed("flat map contains no nodes"));
    }

    let mut roots = Vec::new();
    let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for (id, record) in nodes {
        match record.parent_id.as_deref() {
            None => roots.push(id.as_str()),
            Some(parent) if nodes.contains_key(parent) => {
                children_of.entry(parent).or_default().push(id.as_str());
            }
            Some(parent) => {
                return Err(FormatError::malformed(format!(
                    "node '{id}' references missing parent '{parent}'"
                )));
            }
        }
    }

    if roots.is_empty() {
        return Err(FormatError::malformed(
            "flat map has no root node (every node has a parentId)",
        ));
    }

    let mut builder = Builder {
        document: &document,
        children_of: &children_of,
        visited: 0,
    };
    let mut trees: Vec<LoomTree> = roots.iter().map(|root| builder.build(root)).collect();

    if builder.visited != nodes.len() {
        let mut unreachable: Vec<&str> = nodes
            .keys()
            .map(String::as_str)
            .filter(|id| !is_reachable(id, &document))
            .collect();
        unreachable.truncate(5);
        return Err(FormatError::malformed(format!(
            "{} node(s) are not reachable from any root (parentId cycle), e.g. {}",
            nodes.len() - builder.visited,
            unreachable.join(", ")
        )));
    }

    debug!(
        nodes = nodes.len(),
        roots = trees.len(),
        "decoded flat-map document"
    );

    if trees.len() == 1 {
        Ok(trees.remove(0))
    } else {
        Ok(LoomTree {
            id: Some(generate_id()),
            text: String::new(),
            children: trees,
        })
    }
}

struct Builder<'a> {
    document: &'a FlatMapDocument,
    children_of: &'a HashMap<&'a str, Vec<&'a str>>,
    visited: usize,
}

impl<'a> Builder<'a> {
    fn build(&mut self, root: &'a str) -> LoomTree {
        let document = self.document;
        let children_of = self.children_of;
        let visited = &mut self.visited;
        assemble(
            root,
            |id| {
                *visited += 1;
                let node = LoomTree {
                    id: Some(id.to_string()),
                    text: document.nodes[id].text.clone(),
                    children: Vec::new(),
                };
                (node, children_of.get(id).cloned().unwrap_or_default())
            },
            LoomTree::add_child,
        )
    }
}

/// Follows `parentId` links from `id`; true when they end at a root.
fn is_reachable(id: &str, document: &FlatMapDocument) -> bool {
    let mut current = id;
    for _ in 0..document.nodes.len() {
        match document.nodes.get(current).and_then(|r| r.parent_id.as_deref()) {
            None => return true,
            Some(parent) => current = parent,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::flatmap::encode;

    fn record(text: &str, parent: Option<&str>) -> Value {
        serde_json::json!({
            "text": text,
            "parentId": parent,
            "unread": false,
            "collapsed": false,
            "bookmarked": false,
            "color": null,
            "lastVisited": 0,
            "children": []
        })
    }

    fn document(records: Vec<(&str, Value)>) -> String {
        let mut nodes = serde_json::Map::new();
        for (id, value) in records {
            nodes.insert(id.to_string(), value);
        }
        serde_json::json!({
            "hoisted": [],
            "nodes": nodes,
            "current": null,
            "generating": null
        })
        .to_string()
    }

    #[test]
    fn test_single_root() {
        let source = document(vec![
            ("r", record("root", None)),
            ("a", record("A", Some("r"))),
            ("b", record("B", Some("a"))),
        ]);
        let tree = decode(&source).unwrap();
        assert_eq!(tree.id.as_deref(), Some("r"));
        assert_eq!(tree.texts(), vec!["root", "A", "B"]);
        assert_eq!(tree.children[0].children[0].id.as_deref(), Some("b"));
    }

    #[test]
    fn test_two_roots_get_synthetic_root() {
        let source = document(vec![
            ("one", record("first", None)),
            ("two", record("second", None)),
        ]);
        let tree = decode(&source).unwrap();

        assert_eq!(tree.text, "");
        assert!(tree.id.is_some());
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].text, "first");
        assert_eq!(tree.children[1].text, "second");
    }

    #[test]
    fn test_children_array_is_ignored() {
        let mut root = record("root", None);
        root["children"] = serde_json::json!(["ghost"]);
        let source = document(vec![("r", root), ("a", record("A", Some("r")))]);

        let tree = decode(&source).unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.children[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_children_follow_key_order() {
        let source = document(vec![
            ("r", record("root", None)),
            ("z", record("second branch", Some("r"))),
            ("m", record("first branch", Some("r"))),
        ]);
        let tree = decode(&source).unwrap();
        let texts: Vec<_> = tree.children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["second branch", "first branch"]);
    }

    #[test]
    fn test_child_may_precede_parent() {
        let source = document(vec![
            ("a", record("A", Some("r"))),
            ("r", record("root", None)),
        ]);
        let tree = decode(&source).unwrap();
        assert_eq!(tree.texts(), vec!["root", "A"]);
    }

    #[test]
    fn test_dangling_parent_is_malformed() {
        let source = document(vec![
            ("r", record("root", None)),
            ("a", record("A", Some("missing"))),
        ]);
        match decode(&source) {
            Err(FormatError::MalformedInput(msg)) => {
                assert!(msg.contains("'a'"));
                assert!(msg.contains("'missing'"));
            }
            other => panic!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_is_malformed() {
        let source = document(vec![
            ("r", record("root", None)),
            ("a", record("A", Some("b"))),
            ("b", record("B", Some("a"))),
        ]);
        match decode(&source) {
            Err(FormatError::MalformedInput(msg)) => assert!(msg.contains("2 node(s)")),
            other => panic!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_no_root_is_malformed() {
        let source = document(vec![("a", record("A", Some("a")))]);
        assert!(matches!(
            decode(&source),
            Err(FormatError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_empty_nodes_is_malformed() {
        assert!(matches!(
            decode(r#"{"hoisted": [], "nodes": {}, "current": null, "generating": null}"#),
            Err(FormatError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_round_trip_preserves_child_order() {
        let tree = LoomTree::with_children(
            "r",
            "root",
            vec![
                LoomTree::new("1", "one"),
                LoomTree::with_children("2", "two", vec![LoomTree::new("3", "three")]),
                LoomTree::new("4", "four"),
            ],
        );
        let json = serde_json::to_string(&encode(&tree)).unwrap();
        let decoded = decode(&json).unwrap();
        assert_eq!(decoded.texts(), tree.texts());
        assert_eq!(decoded.node_count(), tree.node_count());
    }

    #[test]
    fn test_long_chain_decodes() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let records = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let parent = i.checked_sub(1).map(|p| ids[p].as_str());
                (id.as_str(), record("x", parent))
            })
            .collect();
        let tree = decode(&document(records)).unwrap();
        assert_eq!(tree.node_count(), 50_000);
        assert_eq!(tree.depth(), 50_000);
    }

    #[test]
    fn test_long_chain_round_trip() {
        let mut tree = LoomTree::new("leaf", "leaf");
        for i in 0..20_000 {
            tree = LoomTree::with_children(i.to_string(), "x", vec![tree]);
        }
        let json = serde_json::to_string(&encode(&tree)).unwrap();
        let decoded = decode(&json).unwrap();
        assert_eq!(decoded.texts(), tree.texts());
        assert_eq!(decoded.depth(), 20_001);
    }

    #[test]
    fn test_decode_value() {
        let value: Value = serde_json::from_str(&document(vec![("r", record("x", None))])).unwrap();
        assert_eq!(decode_value(value).unwrap(), LoomTree::new("r", "x"));
    }
}
