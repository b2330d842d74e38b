//! Function boundary resolution.
//!
//! Given a cursor offset this module answers "what would a comment toggle act
//! on here?". Two strategies run in order and the first hit wins:
//!
//! 1. *Live function*: the structural lookup reports an enclosing function or
//!    method (probing `offset - 1` as well, so a cursor resting right after the
//!    closing brace still counts). The node range is extended upward over
//!    attribute lines; trailing blank lines are never included.
//! 2. *Previously-commented function*: either a single block comment token
//!    whose content reads like a function, or a function found by scanning the
//!    run of `//` lines around the cursor (see `comment_run`).
//!
//! A miss is `None`, not an error: callers disable or no-op the action.
//! Resolution never mutates the buffer.

use crate::comment_run::locate_function;
use crate::patterns::{
    BLOCK_OPEN, contains_function_pattern, is_attribute_line, is_line_comment, strip_line_comment,
};
use core_syntax::{NodeRange, StructureLookup};
use core_text::Buffer;
use tracing::{debug, trace};

/// Comment state of a function, modeled as one closed set consumed by the toggle dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    None,
    SingleLine,
    MultiLine,
}

/// Char range of a live function including its leading attribute lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionBoundary {
    pub start: usize,
    pub end: usize,
}

/// Char range and detected style of a previously-commented function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentedFunction {
    pub start: usize,
    pub end: usize,
    pub style: CommentStyle,
}

/// Outcome of one resolution pass. Live and commented targets are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Live(FunctionBoundary),
    Commented(CommentedFunction),
}

impl Resolution {
    pub fn range(&self) -> (usize, usize) {
        match self {
            Resolution::Live(b) => (b.start, b.end),
            Resolution::Commented(c) => (c.start, c.end),
        }
    }
}

/// Resolve the toggle target at `offset`: live function first, then commented function.
pub fn resolve<L: StructureLookup + ?Sized>(
    buffer: &Buffer,
    lookup: &L,
    offset: usize,
) -> Option<Resolution> {
    if let Some(boundary) = find_enclosing_function(buffer, lookup, offset) {
        debug!(target: "actions.resolve", offset, start = boundary.start, end = boundary.end, "live_function");
        return Some(Resolution::Live(boundary));
    }
    let commented = find_commented_function(buffer, lookup, offset);
    match &commented {
        Some(c) => {
            debug!(target: "actions.resolve", offset, start = c.start, end = c.end, style = ?c.style, "commented_function")
        }
        None => trace!(target: "actions.resolve", offset, "no_target"),
    }
    commented.map(Resolution::Commented)
}

/// Live function around `offset` (or just before it), extended over attributes.
pub fn find_enclosing_function<L: StructureLookup + ?Sized>(
    buffer: &Buffer,
    lookup: &L,
    offset: usize,
) -> Option<FunctionBoundary> {
    let node = lookup.enclosing_function(buffer, offset).or_else(|| {
        offset
            .checked_sub(1)
            .and_then(|before| lookup.enclosing_function(buffer, before))
    })?;
    Some(extend_over_attributes(buffer, node))
}

/// Move a function node's start up to the topmost attribute line above it.
///
/// Blank lines between attributes (or between attributes and the function)
/// are tolerated; the first other line stops the walk. Without attributes the
/// node's own start is kept as-is.
pub fn extend_over_attributes(buffer: &Buffer, node: NodeRange) -> FunctionBoundary {
    let function_line = buffer.line_of_offset(node.start);
    let mut attribute_line = function_line;
    let mut check = function_line;
    while check > 0 {
        check -= 1;
        let text = buffer.line_text(check);
        if is_attribute_line(&text) {
            attribute_line = check;
        } else if text.trim().is_empty() {
            continue;
        } else {
            break;
        }
    }
    let start = if attribute_line < function_line {
        buffer.line_start_offset(attribute_line)
    } else {
        node.start
    };
    FunctionBoundary {
        start,
        end: node.end,
    }
}

/// Previously-commented function containing `offset`.
pub fn find_commented_function<L: StructureLookup + ?Sized>(
    buffer: &Buffer,
    lookup: &L,
    offset: usize,
) -> Option<CommentedFunction> {
    if let Some(token) = lookup.enclosing_comment(buffer, offset)
        && token.text.trim_start().starts_with(BLOCK_OPEN)
        && contains_function_pattern(&token.text)
    {
        return Some(CommentedFunction {
            start: token.range.start,
            end: token.range.end,
            style: CommentStyle::MultiLine,
        });
    }

    let current = buffer.line_of_offset(offset);
    if !is_line_comment(&buffer.line_text(current)) {
        return None;
    }
    let (first, last) = comment_run_bounds(buffer, current);
    let contents: Vec<String> = (first..=last)
        .map(|line| strip_line_comment(&buffer.line_text(line)).to_string())
        .collect();
    let span = locate_function(&contents, current - first)?;
    Some(CommentedFunction {
        start: buffer.line_start_offset(first + span.first),
        end: buffer.line_end_offset(first + span.last),
        style: CommentStyle::SingleLine,
    })
}

// Grow a block of blank or `//` lines outward from `line` in both directions.
fn comment_run_bounds(buffer: &Buffer, line: usize) -> (usize, usize) {
    let continues_run = |l: usize| {
        let text = buffer.line_text(l);
        is_line_comment(&text) || text.trim().is_empty()
    };
    let mut first = line;
    while first > 0 && continues_run(first - 1) {
        first -= 1;
    }
    let mut last = line;
    while last + 1 < buffer.line_count() && continues_run(last + 1) {
        last += 1;
    }
    (first, last)
}
