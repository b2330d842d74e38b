//! Comment action dispatcher.
//!
//! `FunctionCommenter` is the two-call contract a host binds to its commands:
//! `is_applicable` drives enablement (read-only), `apply` resolves the target
//! and performs the edit inside one write transaction.

use crate::function_resolver::{CommentStyle, Resolution, resolve};
use crate::toggle::{
    comment_block, comment_lines, contains_block_markers, is_block_commented, is_line_commented,
    uncomment_block, uncomment_lines,
};
use anyhow::Result;
use core_state::EditorState;
use core_syntax::StructureLookup;
use core_text::Buffer;
use tracing::debug;

/// The three user-facing command variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    /// Infer whether to comment or uncomment and in which style.
    Toggle,
    /// Force `//` on every line.
    SingleLine,
    /// Force a single `/* ... */` wrap.
    MultiLine,
}

impl CommentAction {
    /// Undo label recorded for the transaction.
    pub fn label(self) -> &'static str {
        match self {
            CommentAction::Toggle => "toggle_function_comment",
            CommentAction::SingleLine => "single_line_function_comment",
            CommentAction::MultiLine => "block_function_comment",
        }
    }
}

/// What an `apply` call did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Nothing to act on at the offset; buffer untouched.
    NoTarget,
    Commented(CommentStyle),
    Uncommented(CommentStyle),
    /// Block markers expected but not found as a pair; buffer untouched.
    MalformedMarkers,
}

/// Tunables for the generic toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOptions {
    /// Style used by `Toggle` to comment a clean live function.
    pub preferred_style: CommentStyle,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self {
            preferred_style: CommentStyle::MultiLine,
        }
    }
}

pub struct FunctionCommenter<L> {
    lookup: L,
    options: ToggleOptions,
}

impl<L: StructureLookup> FunctionCommenter<L> {
    pub fn new(lookup: L, options: ToggleOptions) -> Self {
        Self { lookup, options }
    }

    /// Resolve the target at `offset` without touching the buffer.
    pub fn resolve(&self, buffer: &Buffer, offset: usize) -> Option<Resolution> {
        resolve(buffer, &self.lookup, offset)
    }

    /// Whether any comment action would do something at `offset`.
    pub fn is_applicable(&self, buffer: &Buffer, offset: usize) -> bool {
        self.resolve(buffer, offset).is_some()
    }

    /// Resolve and toggle at `offset` as one undoable step.
    ///
    /// `NoTarget` and `MalformedMarkers` leave the buffer and undo history unchanged.
    pub fn apply(
        &self,
        state: &mut EditorState,
        offset: usize,
        action: CommentAction,
    ) -> Result<ToggleOutcome> {
        let Some(target) = self.resolve(state.buffer(), offset) else {
            debug!(target: "actions.toggle", offset, action = ?action, "no_target");
            return Ok(ToggleOutcome::NoTarget);
        };
        let outcome =
            state.run_in_write_transaction(action.label(), |buf| Ok(self.apply_to(buf, target, action)))?;
        debug!(target: "actions.toggle", offset, action = ?action, outcome = ?outcome, "applied");
        Ok(outcome)
    }

    fn apply_to(&self, buffer: &mut Buffer, target: Resolution, action: CommentAction) -> ToggleOutcome {
        match target {
            // A commented target goes back the way it was detected, whatever the variant.
            Resolution::Commented(found) => uncomment(buffer, found.start, found.end, found.style),
            Resolution::Live(boundary) => {
                let (start, end) = (boundary.start, boundary.end);
                let text = buffer.slice(start, end);
                let style = match action {
                    CommentAction::SingleLine => CommentStyle::SingleLine,
                    CommentAction::MultiLine => CommentStyle::MultiLine,
                    CommentAction::Toggle => self.inferred_style(&text),
                };
                let already = match style {
                    CommentStyle::SingleLine => is_line_commented(&text),
                    _ => is_block_commented(&text),
                };
                if already {
                    uncomment(buffer, start, end, style)
                } else {
                    comment(buffer, start, end, style)
                }
            }
        }
    }

    fn inferred_style(&self, text: &str) -> CommentStyle {
        if is_block_commented(text) {
            CommentStyle::MultiLine
        } else if is_line_commented(text) || contains_block_markers(text) {
            CommentStyle::SingleLine
        } else {
            match self.options.preferred_style {
                CommentStyle::None => CommentStyle::MultiLine,
                preferred => preferred,
            }
        }
    }
}

fn comment(buffer: &mut Buffer, start: usize, end: usize, style: CommentStyle) -> ToggleOutcome {
    match style {
        CommentStyle::SingleLine => {
            let (first, last) = line_span(buffer, start, end);
            comment_lines(buffer, first, last);
            ToggleOutcome::Commented(CommentStyle::SingleLine)
        }
        _ => {
            comment_block(buffer, start, end);
            ToggleOutcome::Commented(CommentStyle::MultiLine)
        }
    }
}

fn uncomment(buffer: &mut Buffer, start: usize, end: usize, style: CommentStyle) -> ToggleOutcome {
    match style {
        CommentStyle::SingleLine => {
            let (first, last) = line_span(buffer, start, end);
            uncomment_lines(buffer, first, last);
            ToggleOutcome::Uncommented(CommentStyle::SingleLine)
        }
        _ => {
            if uncomment_block(buffer, start, end) {
                ToggleOutcome::Uncommented(CommentStyle::MultiLine)
            } else {
                ToggleOutcome::MalformedMarkers
            }
        }
    }
}

// Lines covered by `[start, end)`; an end resting at a line start belongs to the previous line.
fn line_span(buffer: &Buffer, start: usize, end: usize) -> (usize, usize) {
    let first = buffer.line_of_offset(start);
    let last = buffer.line_of_offset(end.saturating_sub(1).max(start));
    (first, last)
}
