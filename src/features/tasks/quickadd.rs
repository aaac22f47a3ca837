//! Quick-capture parser.
//!
//! Parses strings like "read chapter 4 #math" into a title plus category.

use once_cell::sync::Lazy;
use regex::Regex;

/// Result of parsing a capture string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCapture {
    /// The task title with category tags stripped.
    pub title: String,
    /// Category from the first `#tag` pattern, if any.
    pub category: Option<String>,
}

static CATEGORY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#([\w-]+)").unwrap_or_else(|e| panic!("Invalid category regex: {e}"))
});

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("Invalid whitespace regex: {e}")));

/// Parse a capture string into a title and optional category.
///
/// The first `#tag` becomes the category; every `#tag` is stripped from the
/// title and remaining whitespace is collapsed.
#[must_use]
pub fn parse_capture(input: &str) -> ParsedCapture {
    let category = CATEGORY_PATTERN
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase());

    let stripped = CATEGORY_PATTERN.replace_all(input, " ");
    let title = WHITESPACE_PATTERN
        .replace_all(stripped.trim(), " ")
        .to_string();

    ParsedCapture { title, category }
}
