//! Materialization: mirror a parsed tree on disk.
//!
//! Creates empty files and directories under a caller-supplied
//! destination. The destination is borrowed, never owned: acquisition and
//! cleanup are the caller's problem. A failure on one item is logged and
//! skipped; a single bad entry never aborts the whole tree.

use std::fs;
use std::io;
use std::path::Path;

use crate::normalize;
use crate::types::{Children, TreeNode, sanitize_name};

/// Keywords the post-fallback repair pass recognizes in loose file names.
const CATEGORY_KEYWORDS: &[&str] = &[
    "controller",
    "service",
    "model",
    "route",
    "middleware",
    "util",
    "helper",
    "component",
];

/// Outcome counters for a materialization run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub created: usize,
    pub skipped: usize,
}

/// Create the tree's files and directories under `dest`.
///
/// Idempotent modulo pre-existing paths: directories tolerate "already
/// exists", files are always rewritten empty. Only the creation of `dest`
/// itself can fail the call.
pub fn materialize(root: &TreeNode, dest: &Path) -> io::Result<MaterializeSummary> {
    fs::create_dir_all(dest)?;
    let mut summary = MaterializeSummary::default();
    if let Some(children) = root.children() {
        write_children(children, dest, &mut summary);
    }
    Ok(summary)
}

fn write_children(children: &Children, dir: &Path, summary: &mut MaterializeSummary) {
    for (name, node) in children {
        let path = dir.join(name);
        match node {
            TreeNode::Directory { children } => {
                if let Err(err) = fs::create_dir_all(&path) {
                    eprintln!("[treeforge][warn] skipping {}: {}", path.display(), err);
                    summary.skipped += 1;
                    continue;
                }
                summary.created += 1;
                write_children(children, &path, summary);
            }
            TreeNode::File => {
                if let Err(err) = fs::write(&path, "") {
                    eprintln!("[treeforge][warn] skipping {}: {}", path.display(), err);
                    summary.skipped += 1;
                } else {
                    summary.created += 1;
                }
            }
        }
    }
}

/// Permissive reconstruction used when strict parsing fails.
///
/// Scans the raw text line by line; anything led by a connector glyph or
/// vertical bar becomes an entry. Depth cannot be reliably reconstructed
/// from a document the parser already rejected, so entries land as direct
/// children of `dest` and [`organize_common_folders`] takes a repair pass
/// afterwards. Returns the number of entries created; zero tells the
/// caller to surface the original parse error instead.
pub fn materialize_fallback(text: &str, dest: &Path) -> io::Result<usize> {
    fs::create_dir_all(dest)?;
    let cleaned = normalize::clean_text(text);
    let mut created = 0usize;

    for line in cleaned.lines().skip(1) {
        let trimmed = line.trim_start();
        let glyph_led = trimmed.starts_with(['│', '├', '└', '─', '|', '`'])
            || trimmed.starts_with("--");
        if !glyph_led {
            continue;
        }

        let label = extract_name_aggressively(line);
        if label.is_empty() {
            continue;
        }
        let is_dir = label.ends_with('/');
        let name = sanitize_name(label.trim_end_matches('/'));
        if name.is_empty() {
            continue;
        }

        let path = dest.join(&name);
        let result = if is_dir {
            fs::create_dir_all(&path)
        } else {
            fs::write(&path, "")
        };
        match result {
            Ok(()) => created += 1,
            Err(err) => {
                eprintln!("[treeforge][warn] skipping {}: {}", path.display(), err);
            }
        }
    }

    if created > 0 {
        let moved = organize_common_folders(dest)?;
        if moved > 0 {
            eprintln!(
                "[treeforge][warn] fallback reconstruction grouped {} file(s) into category folders",
                moved
            );
        }
    }
    Ok(created)
}

/// Drop every glyph and whitespace character from the line; when that
/// leaves nothing, retry leniently by stripping the leading run only.
/// Leading ASCII dashes are connector residue (`|-`, `--`), not part of
/// the name; interior dashes are kept.
fn extract_name_aggressively(line: &str) -> String {
    let cleaned: String = line
        .chars()
        .filter(|c| !matches!(c, '│' | '├' | '└' | '─' | '|' | '`') && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim_start_matches('-');
    if cleaned.is_empty() {
        line.trim_start_matches([' ', '\t', '│', '├', '└', '─', '|', '`', '-'])
            .trim()
            .to_string()
    } else {
        cleaned.to_string()
    }
}

/// Best-effort repair after fallback materialization: a loose top-level
/// file whose name mentions a category keyword moves into the keyword's
/// plural directory ("userController.js" lands in "controllers/").
///
/// This is a fuzzy substring guess about project layout, not structural
/// truth. It can misfile legitimate files; keep it out of the trusted
/// parsing path and do not extend the keyword list without a product
/// reason.
pub fn organize_common_folders(dest: &Path) -> io::Result<usize> {
    let entries: Vec<fs::DirEntry> = fs::read_dir(dest)?.filter_map(Result::ok).collect();
    let mut moved = 0usize;

    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let lower = name.to_lowercase();
        let Some(keyword) = CATEGORY_KEYWORDS.iter().find(|k| lower.contains(**k)) else {
            continue;
        };

        let folder = dest.join(format!("{}s", keyword));
        if let Err(err) = fs::create_dir_all(&folder) {
            eprintln!("[treeforge][warn] cannot create {}: {}", folder.display(), err);
            continue;
        }
        match fs::rename(&path, folder.join(&name)) {
            Ok(()) => moved += 1,
            Err(err) => {
                eprintln!("[treeforge][warn] cannot move {}: {}", path.display(), err);
            }
        }
    }
    Ok(moved)
}
