//! Structural lookups over a buffer's syntax tree.
//!
//! The comment actions only need two read-only questions answered about the
//! code under the cursor: "which function or method encloses this offset?" and
//! "is this offset inside a comment token, and what does it say?". The
//! `StructureLookup` trait is that seam. `PhpStructure` answers it by parsing
//! the buffer with tree-sitter; tests substitute scripted fakes.
//!
//! All ranges crossing this boundary are char offsets into the `Buffer`, the
//! same unit the rest of the workspace uses. Byte offsets stay inside the
//! tree-sitter implementation.

use core_text::Buffer;

mod php;
pub use php::{PhpDialect, PhpStructure};

/// A contiguous char range `[start, end)` covered by one syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    pub start: usize,
    pub end: usize,
}

impl NodeRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "node range must not be inverted");
        Self { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single comment token together with its full source text (markers included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentToken {
    pub range: NodeRange,
    pub text: String,
}

/// Errors raised while preparing a structural lookup.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// The compiled grammar is incompatible with the linked tree-sitter runtime.
    #[error("failed to load {dialect} grammar")]
    Language {
        dialect: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },
}

/// Read-only structural queries against a parsed view of a buffer.
pub trait StructureLookup {
    /// Range of the nearest function or method definition whose span contains
    /// the char at `offset`. A definition ending exactly at `offset` does not
    /// contain it.
    fn enclosing_function(&self, buffer: &Buffer, offset: usize) -> Option<NodeRange>;

    /// The comment token containing the char at `offset`, if any.
    fn enclosing_comment(&self, buffer: &Buffer, offset: usize) -> Option<CommentToken>;
}

impl<T: StructureLookup + ?Sized> StructureLookup for &T {
    fn enclosing_function(&self, buffer: &Buffer, offset: usize) -> Option<NodeRange> {
        (**self).enclosing_function(buffer, offset)
    }
    fn enclosing_comment(&self, buffer: &Buffer, offset: usize) -> Option<CommentToken> {
        (**self).enclosing_comment(buffer, offset)
    }
}

impl<T: StructureLookup + ?Sized> StructureLookup for Box<T> {
    fn enclosing_function(&self, buffer: &Buffer, offset: usize) -> Option<NodeRange> {
        (**self).enclosing_function(buffer, offset)
    }
    fn enclosing_comment(&self, buffer: &Buffer, offset: usize) -> Option<CommentToken> {
        (**self).enclosing_comment(buffer, offset)
    }
}
