//! Treeviz formatter for loom trees
//!
//! Treeviz is a visual outline of a tree, meant for inspecting a file rather than exchanging
//! it, so it can only be serialized.
//!
//! The header names the node count, then every node gets one line: connector, icon and its
//! text, whitespace collapsed and truncated to 30 characters.
//!
//! ```text
//! ⧉ Loom (4 nodes)
//! └─ ¶ Once upon a time
//!   ├─ ¶ there was a princess
//!   │ └─ ¶ who lived in a tower
//!   └─ ¶ there was a dragon
//! ```
//!
//! Icons: `⧉` header, `¶` node with text, `∅` node with empty text.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::common::parse_bool_param;
use crate::tree::LoomTree;
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

fn label(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > LABEL_WIDTH {
        let mut truncated: String = collapsed.chars().take(LABEL_WIDTH - 1).collect();
        truncated.push('…');
        truncated
    } else {
        collapsed
    }
}

/// Write one line per node, depth first, from a stack of pending nodes.
fn format_nodes(tree: &LoomTree, show_ids: bool, output: &mut String) {
    let mut pending = vec![(tree, String::new(), true)];
    while let Some((node, prefix, is_last)) = pending.pop() {
        let connector = if is_last { "└─" } else { "├─" };
        let icon = if node.text.trim().is_empty() { "∅" } else { "¶" };

        output.push_str(&format!("{prefix}{connector} {icon} {}", label(&node.text)));
        if show_ids {
            output.push_str(&format!(" [{}]", node.id().unwrap_or("-")));
        }
        output.push('\n');

        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        let child_count = node.children.len();
        for (i, child) in node.children.iter().enumerate().rev() {
            pending.push((child, child_prefix.clone(), i == child_count - 1));
        }
    }
}

pub fn to_treeviz_str(tree: &LoomTree) -> String {
    render(tree, false)
}

/// Convert a tree to a treeviz string with optional parameters
///
/// # Parameters
///
/// - `"show-ids"`: when `"true"`, every line ends with the node id in brackets
///   (`-` for nodes without one).
pub fn to_treeviz_str_with_params(
    tree: &LoomTree,
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    if let Some(key) = params.keys().find(|key| key.as_str() != "show-ids") {
        return Err(FormatError::NotSupported(format!(
            "Format 'treeviz' does not support parameter '{key}'"
        )));
    }
    let show_ids = match params.get("show-ids") {
        Some(raw) => parse_bool_param("show-ids", raw)?,
        None => false,
    };
    Ok(render(tree, show_ids))
}

fn render(tree: &LoomTree, show_ids: bool) -> String {
    let count = tree.node_count();
    let mut output = format!(
        "⧉ Loom ({count} {})\n",
        if count == 1 { "node" } else { "nodes" }
    );
    format_nodes(tree, show_ids, &mut output);
    output
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree outline (output only)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, tree: &LoomTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }

    fn serialize_with_options(
        &self,
        tree: &LoomTree,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        to_treeviz_str_with_params(tree, options)
    }
}
