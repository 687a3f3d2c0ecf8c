//! Shared fixtures for the format tests.

use loom_babel::LoomTree;
use std::path::PathBuf;

/// Read a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// The tree stored in every `story.*` fixture.
pub fn story() -> LoomTree {
    LoomTree::with_children(
        "n0",
        "The lighthouse keeper woke before dawn.",
        vec![
            LoomTree::with_children(
                "n1",
                " The lamp had gone out.",
                vec![
                    LoomTree::new("n3", " Somewhere below, a ship was sounding its horn."),
                    LoomTree::new("n4", " He reached for the matches."),
                ],
            ),
            LoomTree::new("n2", " A letter had been slipped under the door."),
        ],
    )
}

/// `(depth, text)` for every node in pre-order; ignores ids.
pub fn shape(tree: &LoomTree) -> Vec<(usize, String)> {
    tree.walk()
        .map(|(depth, node)| (depth, node.text.clone()))
        .collect()
}

#[test]
fn test_story_fixture_matches_helper() {
    let tree = loom_babel::formats::nested::decode(&fixture("story.nested.json")).unwrap();
    assert_eq!(tree, story());
}
