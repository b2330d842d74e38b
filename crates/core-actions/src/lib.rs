//! Function comment actions for PHP buffers.
//!
//! Layers, bottom-up:
//! * `patterns`: line classifiers (signatures, attributes, comment markers).
//! * `comment_run`: picks one function out of a run of `//` lines.
//! * `function_resolver`: turns a cursor offset into a live or commented target.
//! * `toggle`: the order-safe text edits that add or remove markers.
//! * `commenter`: the host-facing `is_applicable` / `apply` pair.

pub mod comment_run;
mod commenter;
mod function_resolver;
pub mod patterns;
pub mod toggle;

pub use commenter::{CommentAction, FunctionCommenter, ToggleOptions, ToggleOutcome};
pub use function_resolver::{
    CommentStyle, CommentedFunction, FunctionBoundary, Resolution, extend_over_attributes,
    find_commented_function, find_enclosing_function, resolve,
};
