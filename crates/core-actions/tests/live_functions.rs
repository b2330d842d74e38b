mod common;

use common::{apply_at, commenter, commenter_with, offset_of, state};
use core_actions::{CommentAction, CommentStyle, Resolution, ToggleOptions, ToggleOutcome};
use pretty_assertions::assert_eq;

const SCENARIO: &str = "$a = 1;\n$b = 2;\n$c = 3;\n$d = 4;\n    function foo() {\n        return 1;\n    }\n";

#[test]
fn single_line_comment_then_reinvoke_restores_text() {
    let c = commenter();
    let mut st = state(SCENARIO);
    // Line 6, column 8 in 1-based editor terms.
    let cursor = st.buffer().offset_at(5, 8);
    let out = c.apply(&mut st, cursor, CommentAction::SingleLine).unwrap();
    assert_eq!(out, ToggleOutcome::Commented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().line_text(3), "$d = 4;");
    assert_eq!(st.buffer().line_text(4), "//     function foo() {");
    assert_eq!(st.buffer().line_text(5), "//         return 1;");
    assert_eq!(st.buffer().line_text(6), "//     }");

    let cursor = st.buffer().offset_at(5, 12);
    let out = c.apply(&mut st, cursor, CommentAction::SingleLine).unwrap();
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().text(), SCENARIO);
    assert_eq!(st.undo_depth(), 2);
}

#[test]
fn block_round_trip_on_method() {
    let text = "<?php\nclass A {\n    public function bar() {\n        return 2;\n    }\n}\n";
    let c = commenter();
    let mut st = state(text);
    let out = apply_at(&c, &mut st, "return 2", CommentAction::MultiLine);
    assert_eq!(out, ToggleOutcome::Commented(CommentStyle::MultiLine));
    assert_eq!(
        st.buffer().text(),
        "<?php\nclass A {\n    /* public function bar() {\n        return 2;\n    } */\n}\n"
    );
    let out = apply_at(&c, &mut st, "return 2", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::MultiLine));
    assert_eq!(st.buffer().text(), text);
}

#[test]
fn attributes_travel_with_the_function() {
    let text = "$a = 1;\n\n#[Route('/x')]\n#[Pure]\nfunction foo() {\n    return 1;\n}\n";
    let c = commenter();
    let mut st = state(text);
    apply_at(&c, &mut st, "return 1", CommentAction::SingleLine);
    assert_eq!(
        st.buffer().text(),
        "$a = 1;\n\n// #[Route('/x')]\n// #[Pure]\n// function foo() {\n//     return 1;\n// }\n"
    );
    let out = apply_at(&c, &mut st, "return 1", CommentAction::SingleLine);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().text(), text);

    apply_at(&c, &mut st, "return 1", CommentAction::MultiLine);
    assert!(st.buffer().text().contains("/* #[Route('/x')]\n"));
    apply_at(&c, &mut st, "return 1", CommentAction::MultiLine);
    assert_eq!(st.buffer().text(), text);
}

#[test]
fn toggle_uses_single_line_when_body_holds_block_comment() {
    let text = "function a() {\n    /* inline */\n    return 1;\n}\n";
    let c = commenter();
    let mut st = state(text);
    let out = apply_at(&c, &mut st, "return 1", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Commented(CommentStyle::SingleLine));
    assert_eq!(
        st.buffer().text(),
        "// function a() {\n//     /* inline */\n//     return 1;\n// }\n"
    );
}

#[test]
fn toggle_follows_preferred_style() {
    let text = "function a() {\n    return 1;\n}\n";
    let c = commenter_with(ToggleOptions {
        preferred_style: CommentStyle::SingleLine,
    });
    let mut st = state(text);
    let out = apply_at(&c, &mut st, "return 1", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Commented(CommentStyle::SingleLine));
    let out = apply_at(&c, &mut st, "return 1", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().text(), text);
}

#[test]
fn undo_restores_pre_toggle_text() {
    let text = "function a() {\n    return 1;\n}\n";
    let c = commenter();
    let mut st = state(text);
    apply_at(&c, &mut st, "return 1", CommentAction::Toggle);
    assert_ne!(st.buffer().text(), text);
    assert!(st.dirty);
    assert!(st.undo());
    assert_eq!(st.buffer().text(), text);
    assert!(st.redo());
    assert_eq!(st.buffer().text(), "/* function a() {\n    return 1;\n} */\n");
}

#[test]
fn enablement_tracks_resolution() {
    let text = "<?php\n$x = 1;\n\nfunction a() {\n    return 1;\n}\n";
    let c = commenter();
    let st = state(text);
    assert!(!c.is_applicable(st.buffer(), offset_of(&st, "$x")));
    assert!(c.is_applicable(st.buffer(), offset_of(&st, "return")));
    // Cursor resting just past the closing brace still targets the function.
    let after_brace = offset_of(&st, "}\n") + 1;
    assert!(matches!(
        c.resolve(st.buffer(), after_brace),
        Some(Resolution::Live(_))
    ));
}

#[test]
fn nothing_happens_outside_functions() {
    let text = "$x = 1;\n$y = 2;\n";
    let c = commenter();
    let mut st = state(text);
    let out = apply_at(&c, &mut st, "$y", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::NoTarget);
    assert_eq!(st.buffer().text(), text);
    assert_eq!(st.undo_depth(), 0);
}

#[test]
fn interface_method_round_trip() {
    let text = "interface I {\n    public function x();\n}\n";
    let c = commenter();
    let mut st = state(text);
    let out = apply_at(&c, &mut st, "x()", CommentAction::SingleLine);
    assert_eq!(out, ToggleOutcome::Commented(CommentStyle::SingleLine));
    assert_eq!(
        st.buffer().text(),
        "interface I {\n//     public function x();\n}\n"
    );
    let out = apply_at(&c, &mut st, "x()", CommentAction::SingleLine);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().text(), text);

    apply_at(&c, &mut st, "x()", CommentAction::MultiLine);
    assert_eq!(
        st.buffer().text(),
        "interface I {\n    /* public function x(); */\n}\n"
    );
    apply_at(&c, &mut st, "x()", CommentAction::MultiLine);
    assert_eq!(st.buffer().text(), text);
}

#[test]
fn abstract_method_round_trip_with_toggle() {
    let text = "<?php\nabstract class Shape {\n    abstract public function area(): float;\n\n    public function name() {\n        return 'shape';\n    }\n}\n";
    let c = commenter_with(ToggleOptions {
        preferred_style: CommentStyle::SingleLine,
    });
    let mut st = state(text);
    let out = apply_at(&c, &mut st, "area", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Commented(CommentStyle::SingleLine));
    assert!(
        st.buffer()
            .text()
            .contains("//     abstract public function area(): float;\n\n    public function name()")
    );
    let out = apply_at(&c, &mut st, "area", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().text(), text);
}

#[test]
fn attributed_method_round_trips_in_both_styles() {
    let text = "<?php\nclass A {\n    public $x = 1;\n\n    #[Pure]\n    public function a() {\n        return 1;\n    }\n}\n";
    let c = commenter();
    let mut st = state(text);
    match c.resolve(st.buffer(), offset_of(&st, "return")) {
        Some(Resolution::Live(boundary)) => {
            assert_eq!(boundary.start, offset_of(&st, "#[Pure]"));
        }
        other => panic!("expected live method, got {other:?}"),
    }

    apply_at(&c, &mut st, "return 1", CommentAction::SingleLine);
    assert_eq!(
        st.buffer().text(),
        "<?php\nclass A {\n    public $x = 1;\n\n//     #[Pure]\n//     public function a() {\n//         return 1;\n//     }\n}\n"
    );
    let out = apply_at(&c, &mut st, "return 1", CommentAction::SingleLine);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::SingleLine));
    assert_eq!(st.buffer().text(), text);

    apply_at(&c, &mut st, "return 1", CommentAction::MultiLine);
    assert!(st.buffer().text().contains("    /* #[Pure]\n    public function a() {"));
    let out = apply_at(&c, &mut st, "return 1", CommentAction::Toggle);
    assert_eq!(out, ToggleOutcome::Uncommented(CommentStyle::MultiLine));
    assert_eq!(st.buffer().text(), text);
}
