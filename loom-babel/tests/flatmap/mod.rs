//! Flat-map format against fixtures.

use crate::common::{fixture, shape, story};
use loom_babel::format::Format;
use loom_babel::formats::flatmap::{self, FlatMapFormat};
use loom_babel::FormatError;

#[test]
fn test_decode_fixture() {
    let tree = flatmap::decode(&fixture("story.flatmap.json")).unwrap();

    assert_eq!(shape(&tree), shape(&story()));
    assert_eq!(
        tree.id.as_deref(),
        Some("7c1d5a52-3f8e-4d2b-9a61-0e4f1b2c3d4e")
    );
}

#[test]
fn test_decode_two_roots() {
    let tree = flatmap::decode(&fixture("two_roots.flatmap.json")).unwrap();

    assert_eq!(tree.text, "");
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[0].id.as_deref(), Some("first"));
    assert_eq!(tree.children[0].children.len(), 1);
    assert_eq!(tree.children[1].id.as_deref(), Some("second"));
    assert_eq!(tree.node_count(), 4);
}

#[test]
fn test_synthetic_root_ids_differ_between_calls() {
    let source = fixture("two_roots.flatmap.json");
    let first = flatmap::decode(&source).unwrap();
    let second = flatmap::decode(&source).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn test_encode_story_keeps_shape() {
    let json = FlatMapFormat.serialize(&story()).unwrap();
    let decoded = FlatMapFormat.parse(&json).unwrap();
    assert_eq!(shape(&decoded), shape(&story()));
}

#[test]
fn test_encode_single_node() {
    let doc = flatmap::encode(&loom_babel::LoomTree::new("x", "X"));
    let value = serde_json::to_value(&doc).unwrap();

    let nodes = value["nodes"].as_object().unwrap();
    assert_eq!(nodes.len(), 1);
    let (id, record) = nodes.iter().next().unwrap();
    assert!(record["parentId"].is_null());
    assert_eq!(value["current"], serde_json::Value::String(id.clone()));
    assert_eq!(value["hoisted"], serde_json::json!([]));
    assert!(value["generating"].is_null());
}

#[test]
fn test_dangling_parent_is_reported() {
    let source = fixture("story.flatmap.json").replacen(
        "\"parentId\": \"b2a4c6e8-1d3f-4a5b-8c7d-9e0f1a2b3c4d\"",
        "\"parentId\": \"deleted-node\"",
        1,
    );
    match flatmap::decode(&source) {
        Err(FormatError::MalformedInput(msg)) => assert!(msg.contains("deleted-node")),
        other => panic!("Expected MalformedInput, got {other:?}"),
    }
}
