//! Canonical tree rendering.
//!
//! The single output convention every accepted dialect is normalized to:
//!
//! ```text
//! root-name/
//! ├─ child-a/
//! │  └─ leaf.txt
//! └─ child-b.txt
//! ```

use crate::types::{Children, TreeNode};

/// Serialize a tree back into canonical connector-based text.
///
/// Children render in stored order; the last sibling gets the terminal
/// connector and its descendants continue with blank padding, so vertical
/// connectors only ever appear above a subsequent sibling. No trailing
/// newline: the output is the round-trip target.
pub fn format_tree(root_name: &str, root: &TreeNode) -> String {
    let mut out = format!("{}/", root_name);
    if let Some(children) = root.children() {
        format_children(children, "", &mut out);
    }
    out
}

fn format_children(children: &Children, prefix: &str, out: &mut String) {
    let count = children.len();
    for (idx, (name, node)) in children.iter().enumerate() {
        let is_last = idx + 1 == count;
        out.push('\n');
        out.push_str(prefix);
        out.push_str(if is_last { "└─ " } else { "├─ " });
        out.push_str(name);
        if node.is_dir() {
            out.push('/');
        }
        if let Some(grandchildren) = node.children() {
            let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
            format_children(grandchildren, &child_prefix, out);
        }
    }
}
