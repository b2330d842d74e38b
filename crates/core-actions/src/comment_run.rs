//! Locating one previously-commented function inside a run of `//` lines.
//!
//! A *run* is a maximal block of consecutive lines that are each either blank
//! or `//`-prefixed. Blank lines do not end a run, so several commented
//! functions separated by empty lines are scanned together and the cursor
//! line decides which of them is meant.
//!
//! Everything here works on the run's *normalized* content: each line with
//! its `//` marker (and one following space) already removed. Line indices
//! are relative to the first line of the run.

use crate::patterns::{is_attribute_line, is_function_signature};
use tracing::trace;

/// Line span `[first, last]` (inclusive, run-relative) of one commented function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    pub first: usize,
    pub last: usize,
}

/// A function found in a run: where its attributes start and where its
/// `function` keyword sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FunctionHead {
    effective_start: usize,
    keyword_line: usize,
}

/// Pick the function owning `cursor` and find its closing brace.
///
/// Returns `None` when the run holds no signature, when the cursor sits above
/// the first function's attributes, or when the selected function's braces
/// never balance before the run ends.
pub fn locate_function(contents: &[String], cursor: usize) -> Option<RunSpan> {
    let heads = function_heads(contents);
    let selected = select_head(&heads, cursor, contents.len())?;
    let close = closing_line(contents, selected.keyword_line);
    trace!(
        target: "actions.resolve",
        functions = heads.len(),
        effective_start = selected.effective_start,
        keyword_line = selected.keyword_line,
        close = ?close,
        "comment_run_scan"
    );
    close.map(|last| RunSpan {
        first: selected.effective_start,
        last,
    })
}

fn function_heads(contents: &[String]) -> Vec<FunctionHead> {
    contents
        .iter()
        .enumerate()
        .filter(|(_, content)| is_function_signature(content))
        .map(|(keyword_line, _)| FunctionHead {
            effective_start: effective_start(contents, keyword_line),
            keyword_line,
        })
        .collect()
}

// Walk upward over attribute lines; blank lines are skipped, anything else stops the walk.
fn effective_start(contents: &[String], keyword_line: usize) -> usize {
    let mut start = keyword_line;
    for line in (0..keyword_line).rev() {
        let trimmed = contents[line].trim();
        if is_attribute_line(trimmed) {
            start = line;
        } else if trimmed.is_empty() {
            continue;
        } else {
            break;
        }
    }
    start
}

// Each function owns the lines from its effective start up to the next function's.
fn select_head(heads: &[FunctionHead], cursor: usize, run_len: usize) -> Option<FunctionHead> {
    heads.iter().enumerate().find_map(|(i, head)| {
        let next = heads.get(i + 1).map_or(run_len, |h| h.effective_start);
        (head.effective_start..next)
            .contains(&cursor)
            .then_some(*head)
    })
}

fn closing_line(contents: &[String], keyword_line: usize) -> Option<usize> {
    let mut scanner = BraceScanner::default();
    (keyword_line..contents.len()).find(|&line| scanner.feed_line(&contents[line]))
}

/// Finds the line that ends a function declaration.
///
/// A body ends when brace depth returns to zero after its opening brace. A
/// `;` seen before any brace ends a body-less declaration (interface or
/// abstract method). Braces and semicolons inside quoted string literals are
/// ignored. String state is line-local: an unterminated quote stops mattering
/// at the end of its line, so a stray apostrophe cannot swallow the rest of
/// the run.
#[derive(Debug, Default)]
pub struct BraceScanner {
    depth: i64,
    opened: bool,
}

impl BraceScanner {
    /// Feed one line; returns true once the declaration has ended.
    pub fn feed_line(&mut self, line: &str) -> bool {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for ch in line.chars() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '\'' | '"' => quote = Some(ch),
                ';' if !self.opened && self.depth == 0 => return true,
                '{' => {
                    self.depth += 1;
                    self.opened = true;
                }
                '}' => {
                    self.depth -= 1;
                    if self.opened && self.depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}
