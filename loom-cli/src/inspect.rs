//! Rendering for `loom inspect`
//!
//! The report is the treeviz outline of the tree followed by a short summary:
//!
//! ```text
//! ⧉ Loom (3 nodes)
//! └─ ¶ A
//!   └─ ¶ B
//!     └─ ¶ C
//!
//! format: nested
//! nodes:  3
//! depth:  3
//! leaves: 1
//! ```

use loom_babel::formats::treeviz::to_treeviz_str_with_params;
use loom_babel::{FormatError, LoomTree};
use std::collections::HashMap;

/// Build the inspect report for a tree read as `format`.
pub fn render_report(
    tree: &LoomTree,
    format: &str,
    params: &HashMap<String, String>,
) -> Result<String, FormatError> {
    let mut output = to_treeviz_str_with_params(tree, params)?;
    let leaves = tree.walk().filter(|(_, node)| node.is_leaf()).count();

    output.push('\n');
    output.push_str(&format!("format: {format}\n"));
    output.push_str(&format!("nodes:  {}\n", tree.node_count()));
    output.push_str(&format!("depth:  {}\n", tree.depth()));
    output.push_str(&format!("leaves: {leaves}\n"));

    let duplicates = tree.duplicate_ids();
    if !duplicates.is_empty() {
        output.push_str(&format!("duplicate ids: {}\n", duplicates.join(", ")));
    }
    Ok(output)
}
