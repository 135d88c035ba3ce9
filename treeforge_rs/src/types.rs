use serde::{Deserialize, Serialize};

pub const COLOR_RED: &str = "\u{001b}[31m";
pub const COLOR_RESET: &str = "\u{001b}[0m";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputMode {
    Human,
    Json,
}

/// Ordered child container for a directory node.
///
/// Sibling order is document order and is semantically significant (the
/// canonical formatter renders children in stored order), so this is a
/// sequence of pairs rather than a map. Inserting an existing name
/// replaces the node in place, keeping its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children(Vec<(String, TreeNode)>);

impl Children {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TreeNode> {
        self.0
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Insert a child, overwriting a same-named earlier entry in place.
    pub fn insert(&mut self, name: String, node: TreeNode) {
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = node,
            None => self.0.push((name, node)),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, TreeNode)> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a (String, TreeNode);
    type IntoIter = std::slice::Iter<'a, (String, TreeNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A single node in a parsed tree. Files are leaves with no payload;
/// materialized files are always empty placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeNode {
    File,
    Directory { children: Children },
}

impl TreeNode {
    pub fn dir() -> Self {
        TreeNode::Directory {
            children: Children::new(),
        }
    }

    pub fn file() -> Self {
        TreeNode::File
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            TreeNode::Directory { children } => Some(children),
            TreeNode::File => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            TreeNode::Directory { children } => Some(children),
            TreeNode::File => None,
        }
    }
}

/// Result of a successful parse: root name plus the root directory node.
/// The root is always a directory, even when the source line lacked the
/// trailing slash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedTree {
    pub root_name: String,
    pub root: TreeNode,
}

/// Replace characters that are invalid in file and folder names on the
/// common filesystems with underscores.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// One entry from a flat repository listing (remote API or archive walk).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// A repository branch, with the default branch marked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

/// Shape statistics for a parsed tree (the "preview" numbers).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub folders: usize,
    pub files: usize,
    pub max_depth: usize,
    pub max_breadth: usize,
}

impl TreeStats {
    pub fn collect(root: &TreeNode) -> Self {
        let mut stats = TreeStats::default();
        walk(root, 0, &mut stats);
        stats
    }
}

fn walk(node: &TreeNode, depth: usize, stats: &mut TreeStats) {
    let Some(children) = node.children() else {
        return;
    };
    stats.max_breadth = stats.max_breadth.max(children.len());
    for (_, child) in children {
        match child {
            TreeNode::File => stats.files += 1,
            TreeNode::Directory { .. } => {
                stats.folders += 1;
                stats.max_depth = stats.max_depth.max(depth + 1);
                walk(child, depth + 1, stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_preserve_insertion_order() {
        let mut children = Children::new();
        children.insert("zeta".to_string(), TreeNode::file());
        children.insert("alpha".to_string(), TreeNode::file());
        children.insert("mid".to_string(), TreeNode::dir());

        let names: Vec<&str> = children.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_insert_overwrites_in_place() {
        let mut children = Children::new();
        children.insert("a".to_string(), TreeNode::file());
        children.insert("b".to_string(), TreeNode::file());
        children.insert("a".to_string(), TreeNode::dir());

        let names: Vec<&str> = children.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(children.get("a").is_some_and(TreeNode::is_dir));
    }

    #[test]
    fn sanitize_replaces_forbidden_characters() {
        assert_eq!(sanitize_name("a<b>c:d\"e|f?g*h\\i"), "a_b_c_d_e_f_g_h_i");
        assert_eq!(sanitize_name("plain-name_1.txt"), "plain-name_1.txt");
    }

    #[test]
    fn stats_count_shape() {
        let mut src = Children::new();
        src.insert("index.js".to_string(), TreeNode::file());
        src.insert(
            "deep".to_string(),
            TreeNode::Directory {
                children: Children::new(),
            },
        );
        let mut root_children = Children::new();
        root_children.insert(
            "src".to_string(),
            TreeNode::Directory { children: src },
        );
        root_children.insert("README.md".to_string(), TreeNode::file());
        let root = TreeNode::Directory {
            children: root_children,
        };

        let stats = TreeStats::collect(&root);
        assert_eq!(stats.folders, 2);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.max_breadth, 2);
    }
}
