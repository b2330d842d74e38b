use core_text::Buffer;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// A whole-buffer snapshot for undo/redo. Snapshots are cheap: rope clones share structure.
#[derive(Clone)]
pub struct EditSnapshot {
    /// Label of the write transaction that produced the following state.
    pub label: &'static str,
    pub buffer: Buffer,
    pub cursor: usize,
    /// Content hash of the buffer at snapshot capture.
    pub hash: u64,
}

pub struct UndoEngine {
    undo_stack: Vec<EditSnapshot>,
    redo_stack: Vec<EditSnapshot>,
    /// Count of snapshots skipped due to identical successive state.
    undo_snapshots_skipped: AtomicU64,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_snapshots_skipped: AtomicU64::new(0),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn snapshots_skipped(&self) -> u64 {
        self.undo_snapshots_skipped.load(Ordering::Relaxed)
    }
    /// Label of the transaction the next `undo` would revert.
    pub fn last_label(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|s| s.label)
    }

    /// Record the pre-edit state of one committed transaction.
    pub fn push_snapshot(&mut self, label: &'static str, cursor: usize, buffer: &Buffer) {
        let current_hash = buffer_hash(buffer);
        if let Some(last) = self.undo_stack.last()
            && last.hash == current_hash
        {
            self.undo_snapshots_skipped.fetch_add(1, Ordering::Relaxed);
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), hash = current_hash, "snapshot_dedupe_skip");
            return;
        }
        let snap = EditSnapshot {
            label,
            buffer: buffer.clone(),
            cursor,
            hash: current_hash,
        };
        self.undo_stack.push(snap);
        trace!(target: "state.undo", label, undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), lines = buffer.line_count(), hash = current_hash, "push_snapshot");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, cursor: &mut usize, buffer: &mut Buffer) -> bool {
        if let Some(last) = self.undo_stack.pop() {
            trace!(target: "state.undo", label = last.label, undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
            let current = EditSnapshot {
                label: last.label,
                buffer: buffer.clone(),
                cursor: *cursor,
                hash: buffer_hash(buffer),
            };
            self.redo_stack.push(current);
            *buffer = last.buffer;
            *cursor = last.cursor;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, cursor: &mut usize, buffer: &mut Buffer) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            trace!(target: "state.undo", label = next.label, redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
            let current = EditSnapshot {
                label: next.label,
                buffer: buffer.clone(),
                cursor: *cursor,
                hash: buffer_hash(buffer),
            };
            self.undo_stack.push(current);
            *buffer = next.buffer;
            *cursor = next.cursor;
            true
        } else {
            false
        }
    }
}

pub(crate) fn buffer_hash(buf: &Buffer) -> u64 {
    let mut h = DefaultHasher::new();
    for i in 0..buf.line_count() {
        h.write(buf.line_text(i).as_bytes());
        h.write_u8(b'\n');
    }
    h.finish()
}
