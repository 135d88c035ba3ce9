//! Indentation-sensitive tree parsing.
//!
//! Reconstructs an ordered node tree from normalized tree text. The input
//! dialect is deliberately loose: box-drawing connectors (`├─`, `└──`),
//! ASCII approximations (`|-`, `--`, `` `- ``), or bare indentation all
//! work, and inconsistent indentation collapses to the nearest valid
//! ancestor instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TreeError;
use crate::normalize;
use crate::types::{ParsedTree, TreeNode, sanitize_name};

static ROOT_CAPTURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^/]+)/\s*$").expect("valid regex"));
static ROOT_GLYPHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[│├└─\s]+").expect("valid regex"));
static CONNECTOR_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[│|\s]*(?:├─*|└─*|[`─-]+|│)*\s*").expect("valid regex"));
static DECORATIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[│├└─|`\s-]+$").expect("valid regex"));

/// Parse normalized (or raw) tree text into a [`ParsedTree`].
///
/// The first meaningful line must read as `name/`; every later line is
/// attached to the nearest preceding shallower directory.
pub fn parse(text: &str) -> Result<ParsedTree, TreeError> {
    let normalized = normalize::normalize(text)?;
    if normalized.trim().is_empty() {
        return Err(TreeError::EmptyInput);
    }

    let lines: Vec<&str> = normalized.lines().collect();
    let caps = ROOT_CAPTURE
        .captures(lines[0].trim())
        .ok_or(TreeError::MissingRoot)?;
    let root_name = ROOT_GLYPHS.replace_all(&caps[1], "").to_string();

    let mut root = TreeNode::dir();
    // Stack of (path from the root, indentation level). Parent resolution
    // pops to the nearest shallower entry; the root entry is never popped.
    let mut stack: Vec<(Vec<String>, usize)> = vec![(Vec::new(), 0)];

    for line in &lines[1..] {
        if line.trim().is_empty() {
            continue;
        }

        let level = indent_level(line);
        let label = CONNECTOR_PREFIX.replace(line, "").trim().to_string();
        if label.is_empty() || DECORATIVE.is_match(&label) {
            continue;
        }

        let is_dir = label.ends_with('/');
        let name = sanitize_name(label.strip_suffix('/').unwrap_or(&label));
        if name.is_empty() {
            continue;
        }

        while stack.len() > 1 && stack[stack.len() - 1].1 >= level {
            stack.pop();
        }
        let parent_path = stack[stack.len() - 1].0.clone();

        let node = if is_dir { TreeNode::dir() } else { TreeNode::file() };
        if !insert_at(&mut root, &parent_path, name.clone(), node) {
            // The parent slot was overwritten by a file earlier in the
            // document; the entry has nowhere to live.
            continue;
        }
        if is_dir {
            let mut path = parent_path;
            path.push(name);
            stack.push((path, level));
        }
    }

    Ok(ParsedTree { root_name, root })
}

/// Compute the indentation level of a line.
///
/// Each vertical connector advances one level and swallows the rest of
/// its visual cell (up to two trailing spaces, so both `│  ` and `│   `
/// cells count once). Each remaining run of three to four spaces advances
/// one level. Scanning stops at a branch connector or the first label
/// character. Two-space units map to level zero, which still nests
/// correctly because parent resolution is relative, not absolute.
fn indent_level(line: &str) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let mut level = 0usize;
    let mut run = 0usize;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            ' ' => run += 1,
            '\t' => {
                level += run / 3 + 1;
                run = 0;
            }
            '│' | '|' => {
                // `|-` opens an ASCII branch connector, not a vertical.
                if chars[i] == '|' && matches!(chars.get(i + 1), Some('-')) {
                    break;
                }
                level += run / 3 + 1;
                run = 0;
                let mut swallowed = 0;
                while swallowed < 2 && matches!(chars.get(i + 1), Some(' ')) {
                    i += 1;
                    swallowed += 1;
                }
            }
            _ => break,
        }
        i += 1;
    }
    level + run / 3
}

fn insert_at(root: &mut TreeNode, path: &[String], name: String, node: TreeNode) -> bool {
    let mut current = root;
    for segment in path {
        let next = match current.children_mut().and_then(|c| c.get_mut(segment)) {
            Some(next) if next.is_dir() => next,
            _ => return false,
        };
        current = next;
    }
    match current.children_mut() {
        Some(children) => {
            children.insert(name, node);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Children;

    fn dir_with(entries: Vec<(&str, TreeNode)>) -> TreeNode {
        let mut children = Children::new();
        for (name, node) in entries {
            children.insert(name.to_string(), node);
        }
        TreeNode::Directory { children }
    }

    #[test]
    fn parses_canonical_format() {
        let tree = parse("app/\n├─ src/\n│  └─ index.js\n└─ README.md").unwrap();
        assert_eq!(tree.root_name, "app");

        let expected = dir_with(vec![
            ("src", dir_with(vec![("index.js", TreeNode::file())])),
            ("README.md", TreeNode::file()),
        ]);
        assert_eq!(tree.root, expected);
    }

    #[test]
    fn parses_double_dash_dialect() {
        let text = "app/\n├── src/\n│   ├── main.rs\n│   └── util.rs\n└── Cargo.toml";
        let tree = parse(text).unwrap();

        let expected = dir_with(vec![
            (
                "src",
                dir_with(vec![
                    ("main.rs", TreeNode::file()),
                    ("util.rs", TreeNode::file()),
                ]),
            ),
            ("Cargo.toml", TreeNode::file()),
        ]);
        assert_eq!(tree.root, expected);
    }

    #[test]
    fn parses_pure_indentation_dialect() {
        let tree = parse("my-proj/\n  src/\n    a.js\n  b.js").unwrap();
        assert_eq!(tree.root_name, "my-proj");

        let expected = dir_with(vec![
            ("src", dir_with(vec![("a.js", TreeNode::file())])),
            ("b.js", TreeNode::file()),
        ]);
        assert_eq!(tree.root, expected);
    }

    #[test]
    fn parses_ascii_connectors() {
        let tree = parse("app/\n|- src/\n|  `- main.rs\n`- notes.txt").unwrap();

        let expected = dir_with(vec![
            ("src", dir_with(vec![("main.rs", TreeNode::file())])),
            ("notes.txt", TreeNode::file()),
        ]);
        assert_eq!(tree.root, expected);
    }

    #[test]
    fn missing_root_is_an_error() {
        // Normalization forces a slash onto the first line, so a genuinely
        // missing root needs a first line that cannot be coerced at all.
        assert!(matches!(parse("/\n/"), Err(TreeError::MissingRoot)));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse(""), Err(TreeError::EmptyInput)));
    }

    #[test]
    fn deep_jump_collapses_to_nearest_ancestor() {
        // The first child jumps two visual levels; it still lands under
        // the root because there is no other ancestor to attach to.
        let tree = parse("proj/\n        └─ a/\n            └─ b.txt").unwrap();

        let expected = dir_with(vec![("a", dir_with(vec![("b.txt", TreeNode::file())]))]);
        assert_eq!(tree.root, expected);
    }

    #[test]
    fn decorative_lines_are_skipped() {
        let tree = parse("app/\n│\n├─ a.txt\n│  │\n└─ b.txt").unwrap();

        let expected = dir_with(vec![
            ("a.txt", TreeNode::file()),
            ("b.txt", TreeNode::file()),
        ]);
        assert_eq!(tree.root, expected);
    }

    #[test]
    fn duplicate_names_overwrite_keeping_position() {
        let tree = parse("app/\n├─ a\n├─ b\n└─ a/").unwrap();

        let children = tree.root.children().unwrap();
        let names: Vec<&str> = children.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(children.get("a").is_some_and(TreeNode::is_dir));
    }

    #[test]
    fn forbidden_characters_are_sanitized() {
        let tree = parse("app/\n└─ bad:name?.txt").unwrap();
        assert!(tree.root.children().unwrap().get("bad_name_.txt").is_some());
    }

    #[test]
    fn root_connector_glyphs_are_stripped() {
        let tree = parse("── app/\n└─ a.txt").unwrap();
        assert_eq!(tree.root_name, "app");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent_level("├─ src/"), 0);
        assert_eq!(indent_level("│  └─ leaf.txt"), 1);
        assert_eq!(indent_level("│   │   └── deep.rs"), 2);
        assert_eq!(indent_level("    a.js"), 1);
        assert_eq!(indent_level("  a.js"), 0);
        assert_eq!(indent_level("|  `- main.rs"), 1);
        assert_eq!(indent_level("|- src/"), 0);
        assert_eq!(indent_level("\t\tdeep/"), 2);
    }
}
