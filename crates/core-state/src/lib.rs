//! Editor state: the active buffer, cursor, undo history, and the write
//! transaction every mutation runs inside.
//!
//! Write transactions:
//! - `run_in_write_transaction` is the only mutation entry point used by the
//!   comment actions. The closure edits the live buffer directly; if it returns
//!   an error the pre-transaction snapshot is put back, so a failed toggle never
//!   leaves a half-edited buffer behind.
//! - A committed transaction that changed the text becomes exactly one undo
//!   step, however many inserts/deletes it performed. A transaction that left
//!   the text untouched records nothing.
//!
//! Line endings:
//! - Buffers are LF-only internally. File hosts normalize on load with
//!   `normalize_line_endings` and convert back with `LineEnding::restore`.
//!
//! Telemetry:
//! - Transaction lifecycle emits `state.txn` events (`txn_commit`,
//!   `txn_noop`, `txn_rollback`); snapshot stack changes live under
//!   `state.undo`.

use anyhow::Result;
use core_text::Buffer;
use tracing::{debug, trace};

pub mod undo;
use undo::{UndoEngine, buffer_hash};
pub use undo::{EditSnapshot, UNDO_HISTORY_MAX};

/// Line ending style detected from source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Convert LF-only `text` back to this line ending style.
    pub fn restore(self, text: &str) -> String {
        match self {
            LineEnding::Lf => text.to_string(),
            other => text.replace('\n', other.as_str()),
        }
    }
}

/// LF-only text plus the line ending style it was converted from.
pub struct NormalizedText {
    pub normalized: String,
    pub original: LineEnding,
    /// More than one ending style appeared in the input.
    pub mixed: bool,
}

/// Convert every `\r\n` and lone `\r` in `input` to `\n`.
///
/// `original` is the most frequent style (CRLF wins ties, then LF, then CR),
/// so `original.restore(&normalized)` reproduces any single-style input.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let mut normalized = String::with_capacity(input.len());
    // Occurrences of CRLF, LF, CR in that order.
    let mut counts = [0usize; 3];
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        let style = match ch {
            '\r' if chars.next_if_eq(&'\n').is_some() => 0,
            '\n' => 1,
            '\r' => 2,
            other => {
                normalized.push(other);
                continue;
            }
        };
        counts[style] += 1;
        normalized.push('\n');
    }
    let (original, _) = [LineEnding::Crlf, LineEnding::Lf, LineEnding::Cr]
        .into_iter()
        .zip(counts)
        .fold((LineEnding::Lf, 0), |best, (style, count)| {
            if count > best.1 { (style, count) } else { best }
        });
    let mixed = counts.iter().filter(|&&c| c > 0).count() > 1;
    NormalizedText {
        normalized,
        original,
        mixed,
    }
}

/// Top-level editor state container (single buffer).
pub struct EditorState {
    buffer: Buffer,
    /// Cursor as a char offset into `buffer`.
    pub cursor: usize,
    pub dirty: bool,
    pub original_line_ending: LineEnding,
    undo: UndoEngine,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: 0,
            dirty: false,
            original_line_ending: LineEnding::Lf,
            undo: UndoEngine::new(),
        }
    }

    /// Borrow the buffer for read-only queries.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Run `work` against the buffer as one atomic, undoable step.
    ///
    /// On `Err` the buffer is restored to its exact pre-transaction content and
    /// the error is returned; no undo entry is recorded.
    pub fn run_in_write_transaction<T, F>(&mut self, label: &'static str, work: F) -> Result<T>
    where
        F: FnOnce(&mut Buffer) -> Result<T>,
    {
        let snapshot = self.buffer.clone();
        let before = buffer_hash(&snapshot);
        trace!(target: "state.txn", label, "txn_begin");
        match work(&mut self.buffer) {
            Ok(value) => {
                if buffer_hash(&self.buffer) == before {
                    trace!(target: "state.txn", label, "txn_noop");
                } else {
                    self.undo.push_snapshot(label, self.cursor, &snapshot);
                    self.dirty = true;
                    debug!(target: "state.txn", label, undo_depth = self.undo.undo_depth(), "txn_commit");
                }
                if self.cursor > self.buffer.len_chars() {
                    self.cursor = self.buffer.len_chars();
                }
                Ok(value)
            }
            Err(err) => {
                self.buffer = snapshot;
                debug!(target: "state.txn", label, error = %err, "txn_rollback");
                Err(err)
            }
        }
    }

    /// Revert the most recent committed transaction. Returns true if one was reverted.
    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.cursor, &mut self.buffer)
    }

    /// Re-apply the most recently undone transaction. Returns true if applied.
    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.cursor, &mut self.buffer)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }
    pub fn last_transaction_label(&self) -> Option<&'static str> {
        self.undo.last_label()
    }

    /// Buffer contents converted back to the line ending style the file was loaded with.
    pub fn text_for_save(&self) -> String {
        self.original_line_ending.restore(&self.buffer.text())
    }
}
