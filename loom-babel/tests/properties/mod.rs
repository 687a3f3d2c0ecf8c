//! Property tests over randomly generated trees.

use loom_babel::formats::{flatmap, graph, nested};
use loom_babel::LoomTree;
use proptest::prelude::*;

fn arb_tree() -> impl Strategy<Value = LoomTree> {
    let leaf = (proptest::option::of("[a-z0-9]{1,8}"), ".{0,12}").prop_map(|(id, text)| {
        LoomTree {
            id,
            text,
            children: Vec::new(),
        }
    });
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            proptest::option::of("[a-z0-9]{1,8}"),
            ".{0,12}",
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(id, text, children)| LoomTree { id, text, children })
    })
}

/// Gives every node a unique id, as the graph format requires.
fn with_unique_ids(mut tree: LoomTree) -> LoomTree {
    fn relabel(node: &mut LoomTree, next: &mut usize) {
        node.id = Some(format!("node-{next}"));
        *next += 1;
        for child in &mut node.children {
            relabel(child, next);
        }
    }
    relabel(&mut tree, &mut 0);
    tree
}

proptest! {
    #[test]
    fn nested_round_trip_is_identity(tree in arb_tree()) {
        let json = serde_json::to_string(&nested::encode(&tree)).unwrap();
        prop_assert_eq!(nested::decode(&json).unwrap(), tree);
    }

    #[test]
    fn flatmap_has_single_null_parent(tree in arb_tree()) {
        let doc = flatmap::encode(&tree);
        prop_assert_eq!(doc.nodes.len(), tree.node_count());
        let roots = doc.nodes.values().filter(|r| r.parent_id.is_none()).count();
        prop_assert_eq!(roots, 1);
    }

    #[test]
    fn flatmap_round_trip_keeps_texts_in_order(tree in arb_tree()) {
        let json = serde_json::to_string(&flatmap::encode(&tree)).unwrap();
        let decoded = flatmap::decode(&json).unwrap();
        prop_assert_eq!(decoded.texts(), tree.texts());
    }

    #[test]
    fn graph_round_trip_is_identity(tree in arb_tree()) {
        let tree = with_unique_ids(tree);
        let decoded = graph::decode(&graph::encode(&tree).unwrap()).unwrap();
        prop_assert_eq!(decoded.node_count(), tree.node_count());
        prop_assert_eq!(decoded, tree);
    }
}
