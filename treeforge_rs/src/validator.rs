//! Structural linting for tree text.
//!
//! Runs on cleaned (not parsed) text so it can produce diagnostics even
//! for input the parser would reject. Always returns a report; never
//! fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::normalize;

static ROOT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^/]+/\s*$").expect("valid regex"));
static STANDARD_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:│|┃|┆|┇|┊|┋|\|)\s*)*(?:├──|└──|├─|└─)\s+([^/\n]+)(/)?\s*$")
        .expect("valid regex")
});
static SIMPLIFIED_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s│|]*(?:[-─]|\|—+|├─+|└─+)\s+([^/\n]+)(/)?\s*$").expect("valid regex")
});
static FALLBACK_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s│|]*([^│├└─\s][^/\n]+)(/)?\s*$").expect("valid regex"));

/// Lint report: `is_valid` is true iff `errors` is empty. Errors appear
/// in document order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

/// Validate raw tree text against the structural rules.
pub fn validate(raw: &str) -> ValidationReport {
    if raw.trim().is_empty() {
        return ValidationReport::invalid(vec!["Tree structure cannot be empty".to_string()]);
    }

    let cleaned = normalize::clean_text(raw);
    if cleaned.trim().is_empty() {
        return ValidationReport::invalid(vec![
            "Tree structure contains only comments or markdown delimiters".to_string(),
        ]);
    }

    let lines: Vec<&str> = cleaned.lines().collect();
    let mut errors = Vec::new();

    if !lines[0].trim().ends_with('/') {
        errors.push("First line must be a root folder ending with \"/\"".to_string());
    }
    if !ROOT_PATTERN.is_match(lines[0].trim()) {
        errors.push("Root directory must be in the format \"folder-name/\"".to_string());
    }

    let mut previous_level = 0usize;
    let mut jump_reported = false;

    for (i, line) in lines.iter().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let trimmed = line.trim();
        let Some(name_start) = entry_name_start(trimmed) else {
            errors.push(format!("Line {} has invalid format", i + 1));
            continue;
        };

        // Level counts everything before the entry name, in characters,
        // four columns per level.
        let leading_ws = line.chars().count() - line.trim_start().chars().count();
        let level = (leading_ws + trimmed[..name_start].chars().count()).div_ceil(4);

        if level > previous_level + 1 && !jump_reported {
            errors.push(format!(
                "Line {} has inconsistent indentation (expected at most {} levels, got {})",
                i + 1,
                previous_level + 1,
                level
            ));
            jump_reported = true;
        }
        previous_level = level;
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Byte offset where the entry name begins, for the first pattern the
/// line matches: standard connectors, simplified dashes, then the
/// bare-indented-name fallback.
fn entry_name_start(line: &str) -> Option<usize> {
    for pattern in [&*STANDARD_ENTRY, &*SIMPLIFIED_ENTRY, &*FALLBACK_ENTRY] {
        if let Some(caps) = pattern.captures(line) {
            if let Some(name) = caps.get(1) {
                return Some(name.start());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_single_error() {
        let report = validate("");
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Tree structure cannot be empty"]);
    }

    #[test]
    fn comments_only_yields_delimiter_error() {
        let report = validate("# just a note\n# nothing else\n");
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Tree structure contains only comments or markdown delimiters"]
        );
    }

    #[test]
    fn canonical_document_is_valid() {
        let report = validate("app/\n├─ src/\n│  └─ index.js\n└─ README.md");
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn double_dash_document_is_valid() {
        let report = validate("app/\n├── src/\n│   └── main.rs\n└── Cargo.toml");
        assert!(report.is_valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn simplified_document_is_valid() {
        let report = validate("my-proj/\n  src/\n    a.js\n  b.js");
        assert!(report.is_valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn missing_root_slash_is_reported() {
        let report = validate("app\n├─ src/");
        assert!(!report.is_valid);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.contains("must be a root folder"))
        );
    }

    #[test]
    fn invalid_line_is_reported_with_its_number() {
        let report = validate("app/\n├─ ok.txt\n///not/a/line///");
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e == "Line 3 has invalid format"));
    }

    #[test]
    fn two_level_jump_is_one_error() {
        let report = validate("proj/\n    └─ a/\n        └─ b.txt");
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("inconsistent indentation"));
    }

    #[test]
    fn indentation_jump_reported_once() {
        let report = validate("proj/\n        └─ a/\n                └─ b.txt");
        assert!(!report.is_valid);
        let jumps: Vec<&String> = report
            .errors
            .iter()
            .filter(|e| e.contains("inconsistent indentation"))
            .collect();
        assert_eq!(jumps.len(), 1, "errors: {:?}", report.errors);
    }

    #[test]
    fn never_panics_on_garbage() {
        for input in [
            "\u{0}\u{1}\u{2}",
            "│",
            "a",
            "/",
            "¯\\_(ツ)_/¯",
            "```",
            "####",
            "└─",
        ] {
            let _ = validate(input);
        }
    }

    #[test]
    fn validation_is_data_not_failure_for_unparseable_roots() {
        // The parser would reject this; the validator still reports.
        let report = validate("/\n├─ a.txt");
        assert!(!report.is_valid);
        assert!(!report.errors.is_empty());
    }
}
