//! # treeforge
//!
//! **Tree diagrams in, real directory structures out** - a bidirectional
//! converter between hand-typed tree text and actual files on disk.
//!
//! treeforge tolerates the mess real tree diagrams arrive in: mixed
//! connector glyph sets, inconsistent indentation units, markdown code
//! fences, inline comments, and partially corrupted trees. Parsing either
//! produces a deterministic canonical rendering or a precise diagnostic,
//! and a failed parse still falls back to a best-effort reconstruction.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust
//! use treeforge::{formatter, parser};
//!
//! let tree = parser::parse("app/\n├─ src/\n│  └─ index.js\n└─ README.md").unwrap();
//! assert_eq!(tree.root_name, "app");
//!
//! // Round-trip back to canonical text
//! let text = formatter::format_tree(&tree.root_name, &tree.root);
//! assert!(text.starts_with("app/"));
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! treeforge build layout.txt            # materialize + zip
//! treeforge scan ./my-project           # directory -> canonical tree
//! treeforge github rust-lang/cargo      # repository -> canonical tree
//! treeforge validate layout.txt         # lint with diagnostics
//! ```

/// Zip packing and extraction for materialized trees.
pub mod archive;

/// Command-line argument parsing.
pub mod args;

/// Subcommand dispatch shared by the binary.
pub mod cli;

/// Typed failures for normalization and parsing.
pub mod error;

/// Canonical connector-based tree rendering.
///
/// The single output convention used as the round-trip target; see
/// [`formatter::format_tree`].
pub mod formatter;

/// GitHub repository listing via the Git Trees API.
pub mod github;

/// Materialization of parsed trees into empty files and directories,
/// including the permissive fallback used when strict parsing fails.
pub mod materialize;

/// Text normalization: markdown fences, comments, root detection.
pub mod normalize;

/// Indentation-sensitive tree parsing.
///
/// Reconstructs an ordered node tree from any accepted input dialect;
/// see [`parser::parse`].
pub mod parser;

/// Progress UI utilities (spinner, status lines).
pub mod progress;

/// Tree construction from live sources (directory walks, flat listings).
pub mod scan;

/// Common types used throughout the crate.
pub mod types;

/// Structural linting with human-readable diagnostics.
pub mod validator;

/// Parse failure taxonomy.
pub use error::TreeError;

/// Canonical rendering.
pub use formatter::format_tree;

/// Parse tree text into a [`ParsedTree`].
pub use parser::parse;

/// Root name plus root directory node.
pub use types::ParsedTree;

/// A single file or directory node.
pub use types::TreeNode;

/// Shape statistics for a parsed tree.
pub use types::TreeStats;

/// Lint report with ordered diagnostics.
pub use validator::ValidationReport;

/// Run the structural linter.
pub use validator::validate;
