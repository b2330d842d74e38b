//! Comment toggle engine: the textual edits behind every comment action.
//!
//! All offsets are char offsets into the buffer. Every multi-edit operation
//! mutates from the highest offset to the lowest so that no edit shifts an
//! offset a later edit still needs:
//! * block wrap inserts the close marker before the open marker;
//! * block unwrap deletes the close span before the open span;
//! * per-line edits walk lines from last to first.
//!
//! Commenting inserts a marker plus one space (`"// "`, `"/* "`, `" */"`);
//! uncommenting removes a marker plus at most one adjacent space, so a
//! comment/uncomment pair reproduces the original text exactly.

use crate::patterns::{BLOCK_CLOSE, BLOCK_OPEN, LINE_MARKER};
use core_text::Buffer;
use tracing::trace;

const LINE_PREFIX: &str = "// ";
const BLOCK_PREFIX: &str = "/* ";
const BLOCK_SUFFIX: &str = " */";

/// True when `text`, trimmed, is wrapped in a single block comment.
pub fn is_block_commented(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with(BLOCK_OPEN) && trimmed.ends_with(BLOCK_CLOSE)
}

/// True when every line of `text` is blank or starts (after indentation) with `//`.
pub fn is_line_commented(text: &str) -> bool {
    text.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with(LINE_MARKER)
    })
}

/// True when `text` holds a block marker anywhere, so wrapping it would nest comments.
pub fn contains_block_markers(text: &str) -> bool {
    text.contains(BLOCK_OPEN) || text.contains(BLOCK_CLOSE)
}

/// Wrap `[start, end)` in `/* ` ... ` */`.
pub fn comment_block(buffer: &mut Buffer, start: usize, end: usize) {
    buffer.insert(end, BLOCK_SUFFIX);
    buffer.insert(start, BLOCK_PREFIX);
    trace!(target: "actions.toggle", start, end, "comment_block");
}

/// Remove the first `/*` and last `*/` inside `[start, end)`, each with one
/// adjacent space when present (after the opener, before the closer).
///
/// Returns false and leaves the buffer untouched when either marker is
/// missing or the two overlap.
pub fn uncomment_block(buffer: &mut Buffer, start: usize, end: usize) -> bool {
    let text = buffer.slice(start, end);
    let (Some(open_byte), Some(close_byte)) = (text.find(BLOCK_OPEN), text.rfind(BLOCK_CLOSE))
    else {
        trace!(target: "actions.toggle", start, end, "block_markers_missing");
        return false;
    };
    if close_byte < open_byte + BLOCK_OPEN.len() {
        trace!(target: "actions.toggle", start, end, "block_markers_overlap");
        return false;
    }
    let open = char_index(&text, open_byte);
    let close = char_index(&text, close_byte);
    let open_end = if text[open_byte + BLOCK_OPEN.len()..].starts_with(' ') {
        open + 3
    } else {
        open + 2
    };
    let close_start = if text[..close_byte].ends_with(' ') {
        close - 1
    } else {
        close
    };
    // "/* */": the single space is claimed by the opener only.
    let close_start = close_start.max(open_end);
    buffer.delete(start + close_start, start + close + 2);
    buffer.delete(start + open, start + open_end);
    trace!(target: "actions.toggle", start, end, open, close, "uncomment_block");
    true
}

/// Prefix every line in `first_line..=last_line` with `// ` at column zero.
pub fn comment_lines(buffer: &mut Buffer, first_line: usize, last_line: usize) {
    for line in (first_line..=last_line).rev() {
        let offset = buffer.line_start_offset(line);
        buffer.insert(offset, LINE_PREFIX);
    }
    trace!(target: "actions.toggle", first_line, last_line, "comment_lines");
}

/// Remove the first `//` (plus one following space) from every line in
/// `first_line..=last_line`. Lines without a marker are left alone.
pub fn uncomment_lines(buffer: &mut Buffer, first_line: usize, last_line: usize) {
    for line in (first_line..=last_line).rev() {
        let text = buffer.line_text(line);
        let Some(marker_byte) = text.find(LINE_MARKER) else {
            continue;
        };
        let marker = char_index(&text, marker_byte);
        let width = if text[marker_byte + LINE_MARKER.len()..].starts_with(' ') {
            3
        } else {
            2
        };
        let line_start = buffer.line_start_offset(line);
        buffer.delete(line_start + marker, line_start + marker + width);
    }
    trace!(target: "actions.toggle", first_line, last_line, "uncomment_lines");
}

// Char index of a byte position known to lie on a char boundary.
fn char_index(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}
