//! Graph format against fixtures.

use crate::common::{fixture, story};
use loom_babel::format::Format;
use loom_babel::formats::graph::{self, GraphFormat};
use loom_babel::formats::{flatmap, nested};

#[test]
fn test_decode_fixture() {
    // The root is not the first entry and there is an extra non-structural edge.
    let tree = graph::decode(&fixture("story.graph.json")).unwrap();
    assert_eq!(tree, story());
}

#[test]
fn test_round_trip_keeps_ids_and_order() {
    let json = GraphFormat.serialize(&story()).unwrap();
    assert_eq!(graph::decode(&json).unwrap(), story());
}

#[test]
fn test_node_count_preserved_from_flatmap() {
    let tree = flatmap::decode(&fixture("two_roots.flatmap.json")).unwrap();
    let decoded = graph::decode(&graph::encode(&tree).unwrap()).unwrap();
    assert_eq!(decoded.node_count(), tree.node_count());
}

#[test]
fn test_nested_without_ids_cannot_become_graph() {
    let tree = nested::decode(r#"{"root": {"text": "x", "children": []}}"#).unwrap();
    assert!(GraphFormat.serialize(&tree).is_err());
}
