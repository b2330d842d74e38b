//! Rope-based text buffer abstraction.
//!
//! Every offset accepted or returned by [`Buffer`] is a *char* offset into the
//! whole document and every line number is 0-based. Line text never includes
//! the terminator. Passing a line or offset outside the buffer is a contract
//! violation and panics; callers derive indices from earlier lookups against
//! the same buffer, so a bad index is a bug upstream rather than a runtime
//! condition to recover from.

use anyhow::Result;
use ropey::{Rope, RopeSlice};
use tracing::trace;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total number of lines in the buffer. A trailing newline opens one more (empty) line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whole buffer contents as an owned string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of `line` excluding its terminator.
    pub fn line_text(&self, line: usize) -> String {
        let start = self.line_start_offset(line);
        let end = self.line_end_offset(line);
        self.rope.slice(start..end).to_string()
    }

    /// Line containing `offset`. The end-of-buffer offset maps to the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.check_offset(offset);
        self.rope.char_to_line(offset)
    }

    /// Offset of the first char of `line`.
    pub fn line_start_offset(&self, line: usize) -> usize {
        self.check_line(line);
        self.rope.line_to_char(line)
    }

    /// Offset just past the last char of `line`, before any terminator.
    pub fn line_end_offset(&self, line: usize) -> usize {
        self.check_line(line);
        let slice = self.rope.line(line);
        self.rope.line_to_char(line) + slice.len_chars() - terminator_len(slice)
    }

    /// Offset of a (line, column) pair; the column is clamped to the line end.
    pub fn offset_at(&self, line: usize, column: usize) -> usize {
        let start = self.line_start_offset(line);
        let end = self.line_end_offset(line);
        (start + column).min(end)
    }

    /// Text in the char range `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.check_range(start, end);
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` before the char at `offset`; later offsets shift by the inserted length.
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.check_offset(offset);
        self.rope.insert(offset, text);
        trace!(target: "text.buffer", offset, inserted = text.chars().count(), "insert");
    }

    /// Delete the char range `[start, end)`, returning the removed text.
    pub fn delete(&mut self, start: usize, end: usize) -> String {
        self.check_range(start, end);
        if start == end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        trace!(target: "text.buffer", start, end, "delete");
        removed
    }

    /// Byte index of a char offset (for byte-oriented parsers).
    pub fn char_to_byte(&self, offset: usize) -> usize {
        self.check_offset(offset);
        self.rope.char_to_byte(offset)
    }

    /// Char offset of a byte index. Bytes inside a multi-byte char map to that char.
    pub fn byte_to_char(&self, byte: usize) -> usize {
        assert!(
            byte <= self.rope.len_bytes(),
            "byte index {byte} out of bounds (len {})",
            self.rope.len_bytes()
        );
        self.rope.byte_to_char(byte)
    }

    fn check_line(&self, line: usize) {
        assert!(
            line < self.rope.len_lines(),
            "line {line} out of bounds (line count {})",
            self.rope.len_lines()
        );
    }

    fn check_offset(&self, offset: usize) {
        assert!(
            offset <= self.rope.len_chars(),
            "offset {offset} out of bounds (len {})",
            self.rope.len_chars()
        );
    }

    fn check_range(&self, start: usize, end: usize) {
        assert!(start <= end, "inverted range {start}..{end}");
        self.check_offset(end);
    }
}

// Number of trailing chars in `line` that form its terminator (0, 1 or 2 for CRLF).
fn terminator_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' => {
            if len >= 2 && line.char(len - 2) == '\r' {
                2
            } else {
                1
            }
        }
        '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}
