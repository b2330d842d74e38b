//! Line classifiers shared by the resolver and the toggle engine.

use regex::Regex;
use std::sync::LazyLock;

pub const BLOCK_OPEN: &str = "/*";
pub const BLOCK_CLOSE: &str = "*/";
pub const LINE_MARKER: &str = "//";

/// Modifier run followed by a named `function` declaration.
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(public|private|protected|static|final|abstract|\s)*\s*function\s+\w+\s*\(")
        .expect("Invalid signature regex")
});

static NAMED_FUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s+\w+\s*\(").expect("Invalid function regex"));

static MODIFIED_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(public|private|protected|static)\s+(static\s+)?function\s+")
        .expect("Invalid modifier regex")
});

static BLOCK_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\s*").expect("Invalid block open regex"));
static BLOCK_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\*/").expect("Invalid block close regex"));
static LINE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*//\s?").expect("Invalid line prefix regex"));

/// True when `line` (trimmed or not) is a `//` comment line.
pub fn is_line_comment(line: &str) -> bool {
    line.trim().starts_with(LINE_MARKER)
}

/// True for attribute lines: `#[...]`, or the closing line of a multi-line
/// attribute that still carries its `#[` opener.
pub fn is_attribute_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("#[") || (trimmed.ends_with(']') && trimmed.contains("#["))
}

/// True when uncommented line content opens a function declaration.
pub fn is_function_signature(content: &str) -> bool {
    SIGNATURE_RE.is_match(content) || content.trim().starts_with("function ")
}

/// Strip surrounding whitespace, one `//` marker, and at most one space after it.
pub fn strip_line_comment(line: &str) -> &str {
    let trimmed = line.trim();
    let without_marker = trimmed.strip_prefix(LINE_MARKER).unwrap_or(trimmed);
    without_marker.strip_prefix(' ').unwrap_or(without_marker)
}

/// True when a comment token's text, once its markers are removed, still
/// reads like a function declaration.
pub fn contains_function_pattern(comment_text: &str) -> bool {
    let cleaned = BLOCK_OPEN_RE.replace_all(comment_text, "");
    let cleaned = BLOCK_CLOSE_RE.replace_all(&cleaned, "");
    let cleaned = LINE_PREFIX_RE.replace_all(&cleaned, "");
    let cleaned = cleaned.trim();
    NAMED_FUNCTION_RE.is_match(cleaned) || MODIFIED_FUNCTION_RE.is_match(cleaned)
}
