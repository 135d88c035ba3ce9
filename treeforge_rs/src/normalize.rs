//! Tree text normalization.
//!
//! Raw tree diagrams arrive wrapped in markdown code fences, sprinkled
//! with `#` comments and surrounded by preamble prose. [`clean_text`]
//! strips the wrapping; [`normalize`] additionally locates the line that
//! represents the root directory and coerces it into canonical `name/`
//! form, discarding anything before it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TreeError;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\w*\n(.*?)\n```").expect("valid regex"));
static ROOT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^/\s]+/\s*$").expect("valid regex"));

/// Strip markdown fences and comments. Total: any input yields a string.
///
/// When a well-formed fence pair exists the first block's body wins;
/// a stray marker without a closing fence only loses its marker lines.
/// Blank lines and whole-line `#` comments are dropped; an embedded `#`
/// truncates the line (leading indentation is preserved, the parser
/// still needs it).
pub fn clean_text(raw: &str) -> String {
    let body = if raw.contains("```") {
        match FENCED_BLOCK.captures(raw) {
            Some(caps) => caps[1].to_string(),
            None => raw
                .lines()
                .filter(|line| !line.trim_start().starts_with("```"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    } else {
        raw.to_string()
    };

    body.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|line| match line.find('#') {
            Some(idx) => line[..idx].trim_end(),
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean the text and force it to start at the root line.
///
/// Empty input is not an error (an empty string comes back); non-empty
/// input that cleans down to nothing is [`TreeError::EmptyInput`].
pub fn normalize(raw: &str) -> Result<String, TreeError> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    let cleaned = clean_text(raw);
    let lines: Vec<&str> = cleaned.lines().collect();
    if lines.is_empty() {
        return Err(TreeError::EmptyInput);
    }

    // Strict root: a single path segment with a trailing slash.
    if let Some(idx) = lines.iter().position(|line| ROOT_LINE.is_match(line.trim())) {
        return Ok(lines[idx..].join("\n"));
    }

    // Fall back to the first line that opens with a plain character and
    // force the slash onto it.
    if let Some(idx) = lines.iter().position(|line| {
        line.trim()
            .chars()
            .next()
            .is_some_and(|c| c != '/' && !c.is_whitespace())
    }) {
        let mut out: Vec<String> = lines[idx..].iter().map(|s| s.to_string()).collect();
        let root = lines[idx].trim();
        out[0] = if root.ends_with('/') {
            root.to_string()
        } else {
            format!("{}/", root)
        };
        return Ok(out.join("\n"));
    }

    // Last resort: the first remaining line is the root, slash appended.
    let mut out: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
    out[0] = format!("{}/", lines[0].trim());
    Ok(out.join("\n"))
}
