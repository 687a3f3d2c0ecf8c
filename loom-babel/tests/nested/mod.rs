//! Nested format against fixtures and through the registry.

use crate::common::{fixture, story};
use insta::assert_snapshot;
use loom_babel::format::Format;
use loom_babel::formats::nested::{self, NestedFormat};
use loom_babel::formats::treeviz::to_treeviz_str;
use std::collections::HashMap;

#[test]
fn test_fixture_round_trip_is_exact() {
    let tree = nested::decode(&fixture("story.nested.json")).unwrap();
    let again = nested::decode(&NestedFormat.serialize(&tree).unwrap()).unwrap();
    assert_eq!(again, tree);
}

#[test]
fn test_three_node_chain_text_order() {
    let source = r#"{"root": {"id": "a", "text": "A", "children": [
        {"id": "b", "text": "B", "children": [
            {"id": "c", "text": "C", "children": []}
        ]}
    ]}}"#;
    let tree = nested::decode(source).unwrap();
    let encoded = serde_json::to_string(&nested::encode(&tree)).unwrap();
    assert_eq!(nested::decode(&encoded).unwrap().texts(), vec!["A", "B", "C"]);
}

#[test]
fn test_pretty_output_matches_fixture() {
    let mut options = HashMap::new();
    options.insert("pretty".to_string(), "true".to_string());
    let output = NestedFormat.serialize_with_options(&story(), &options).unwrap();
    assert_eq!(output, fixture("story.nested.json").trim_end());
}

#[test]
fn test_story_outline() {
    let tree = nested::decode(&fixture("story.nested.json")).unwrap();
    assert_snapshot!(to_treeviz_str(&tree), @r"
    ⧉ Loom (5 nodes)
    └─ ¶ The lighthouse keeper woke be…
      ├─ ¶ The lamp had gone out.
      │ ├─ ¶ Somewhere below, a ship was s…
      │ └─ ¶ He reached for the matches.
      └─ ¶ A letter had been slipped und…
    ");
}
