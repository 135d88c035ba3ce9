//! Tree construction from live sources.
//!
//! Both builders produce the same node model the text parser does, so the
//! canonical formatter treats them identically: a local directory walk,
//! and a flat remote listing (repository API, archive index).

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

use crate::types::{Children, EntryKind, RemoteEntry, TreeNode};

/// Walk a local directory into a directory node.
///
/// Entries are sorted directories-before-files, then case-insensitive
/// lexicographic, so the rendered tree is deterministic regardless of
/// filesystem iteration order.
pub fn tree_from_directory(dir: &Path) -> io::Result<TreeNode> {
    let mut dir_entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.filter_map(Result::ok).collect();
    sort_entries(&mut dir_entries);

    let mut children = Children::new();
    for entry in dir_entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_dir() {
            children.insert(name, tree_from_directory(&path)?);
        } else {
            children.insert(name, TreeNode::file());
        }
    }
    Ok(TreeNode::Directory { children })
}

fn sort_entries(entries: &mut [fs::DirEntry]) {
    entries.sort_by(|a, b| {
        let a_is_dir = a.path().is_dir();
        let b_is_dir = b.path().is_dir();
        match (a_is_dir, b_is_dir) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .cmp(&b.file_name().to_string_lossy().to_lowercase()),
        }
    });
}

/// Assemble a flat `{path, type}` listing into a directory node.
///
/// Entries are processed in path order so parents land before their
/// children; intermediate directories the listing omits are created on
/// demand.
pub fn tree_from_entries(entries: &[RemoteEntry]) -> TreeNode {
    let mut sorted: Vec<&RemoteEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut root = TreeNode::dir();
    for entry in sorted {
        let parts: Vec<&str> = entry.path.split('/').filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            continue;
        }

        let mut current = &mut root;
        for (idx, part) in parts.iter().enumerate() {
            let children = match current.children_mut() {
                Some(children) => children,
                None => break,
            };
            if idx + 1 == parts.len() {
                let node = match entry.kind {
                    EntryKind::Dir => TreeNode::dir(),
                    EntryKind::File => TreeNode::file(),
                };
                children.insert(part.to_string(), node);
                break;
            }
            if children.get(*part).map(TreeNode::is_dir) != Some(true) {
                children.insert(part.to_string(), TreeNode::dir());
            }
            current = match children.get_mut(*part) {
                Some(node) => node,
                None => break,
            };
        }
    }
    root
}
