//! Canonical in-memory loom tree.
//!
//! Every format converts to and from this representation, so a conversion between two
//! external formats is always `parse(A) -> LoomTree -> serialize(B)`.
//!
//! Children are owned by value: a node can only ever sit under one parent, and a fresh
//! node always starts with its own empty child list.
//!
//! Generation chains can be tens of thousands of levels deep, so nothing here recurses per
//! level: traversal, comparison, cloning and dropping all run on explicit stacks.

use std::collections::HashSet;

/// A node of a loom tree and, recursively, the subtree below it.
#[derive(Debug, Eq, Default)]
pub struct LoomTree {
    /// Opaque identifier. `None` when the source format did not carry one.
    pub id: Option<String>,
    /// Generated text of this branch.
    pub text: String,
    /// Child branches, in generation order.
    pub children: Vec<LoomTree>,
}

impl LoomTree {
    /// Create a leaf node.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        LoomTree {
            id: Some(id.into()),
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create a leaf node without an identifier.
    pub fn anonymous(text: impl Into<String>) -> Self {
        LoomTree {
            id: None,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(
        id: impl Into<String>,
        text: impl Into<String>,
        children: Vec<LoomTree>,
    ) -> Self {
        LoomTree {
            id: Some(id.into()),
            text: text.into(),
            children,
        }
    }

    /// Append a child after the existing ones.
    pub fn add_child(&mut self, child: LoomTree) {
        self.children.push(child);
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Number of levels in this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth + 1).max().unwrap_or(1)
    }

    /// Pre-order iterator yielding `(depth, node)`, with the root at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Texts of all nodes in pre-order.
    pub fn texts(&self) -> Vec<&str> {
        self.walk().map(|(_, node)| node.text.as_str()).collect()
    }

    /// Identifiers that occur more than once, in the order their repeats are met.
    ///
    /// Nodes without an id are ignored.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for (_, node) in self.walk() {
            if let Some(id) = node.id() {
                if !seen.insert(id) && !duplicates.contains(&id) {
                    duplicates.push(id);
                }
            }
        }
        duplicates
    }
}

impl PartialEq for LoomTree {
    fn eq(&self, other: &Self) -> bool {
        // A pre-order listing with depths pins down both shape and content.
        self.walk().map(entry).eq(other.walk().map(entry))
    }
}

fn entry<'a>((depth, node): (usize, &'a LoomTree)) -> (usize, Option<&'a str>, &'a str) {
    (depth, node.id.as_deref(), node.text.as_str())
}

impl Clone for LoomTree {
    fn clone(&self) -> Self {
        assemble(
            self,
            |node| {
                let copy = LoomTree {
                    id: node.id.clone(),
                    text: node.text.clone(),
                    children: Vec::with_capacity(node.children.len()),
                };
                (copy, node.children.iter().collect())
            },
            LoomTree::add_child,
        )
    }
}

impl Drop for LoomTree {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Build a tree top-down from `root` without recursing per level.
///
/// `expand` turns a key into a childless node plus the keys of its children, and `attach`
/// appends a finished child to its parent. Children are attached in the order `expand`
/// listed them.
pub(crate) fn assemble<K, N>(
    root: K,
    mut expand: impl FnMut(K) -> (N, Vec<K>),
    mut attach: impl FnMut(&mut N, N),
) -> N {
    struct Frame<K, N> {
        node: N,
        pending: std::vec::IntoIter<K>,
    }

    let open = |(node, keys): (N, Vec<K>)| Frame {
        node,
        pending: keys.into_iter(),
    };

    let mut ancestors: Vec<Frame<K, N>> = Vec::new();
    let mut current = open(expand(root));
    loop {
        match current.pending.next() {
            Some(key) => {
                let child = open(expand(key));
                ancestors.push(std::mem::replace(&mut current, child));
            }
            None => match ancestors.pop() {
                Some(mut parent) => {
                    attach(&mut parent.node, current.node);
                    current = parent;
                }
                None => return current.node,
            },
        }
    }
}

/// Pre-order traversal over a [`LoomTree`], see [`LoomTree::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a LoomTree)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a LoomTree);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reverse so the first child is popped next.
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
