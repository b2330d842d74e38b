#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{CommentAction, FunctionCommenter, ToggleOptions, ToggleOutcome};
use core_state::EditorState;
use core_syntax::PhpStructure;
use core_text::Buffer;

pub fn commenter() -> FunctionCommenter<PhpStructure> {
    commenter_with(ToggleOptions::default())
}

pub fn commenter_with(options: ToggleOptions) -> FunctionCommenter<PhpStructure> {
    FunctionCommenter::new(PhpStructure::new().expect("php grammars load"), options)
}

pub fn state(text: &str) -> EditorState {
    EditorState::new(Buffer::from_str("test.php", text).unwrap())
}

/// Offset of the first occurrence of `needle`.
pub fn offset_of(state: &EditorState, needle: &str) -> usize {
    let text = state.buffer().text();
    let byte = text.find(needle).unwrap_or_else(|| panic!("{needle:?} not in buffer"));
    text[..byte].chars().count()
}

pub fn apply_at(
    commenter: &FunctionCommenter<PhpStructure>,
    state: &mut EditorState,
    needle: &str,
    action: CommentAction,
) -> ToggleOutcome {
    let offset = offset_of(state, needle);
    commenter.apply(state, offset, action).unwrap()
}
