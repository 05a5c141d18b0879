//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use natatnik::editable::{EditableTextBuffer, KeyEvent, Position};

/// Create a buffer with given text and caret position
pub fn buffer_with(text: &str, line: usize, column: usize) -> EditableTextBuffer {
    let mut buffer = EditableTextBuffer::from_text(text);
    buffer.set_caret(Position::new(line, column));
    buffer
}

/// Create a buffer with given text and a selection (anchor to head)
pub fn buffer_with_selection(
    text: &str,
    anchor: (usize, usize),
    head: (usize, usize),
) -> EditableTextBuffer {
    let mut buffer = EditableTextBuffer::from_text(text);
    buffer.set_selection(
        Position::new(anchor.0, anchor.1),
        Position::new(head.0, head.1),
    );
    buffer
}

/// Feed a key script through `handle_key_press`, falling back to navigation
pub fn type_script(buffer: &mut EditableTextBuffer, script: &str) {
    for event in KeyEvent::parse_script(script).expect("valid key script") {
        if !buffer.handle_key_press(event) {
            buffer.handle_navigation(event);
        }
    }
}

/// Undo `n` times, asserting each undo did something
pub fn undo_n(buffer: &mut EditableTextBuffer, n: usize) {
    for i in 0..n {
        assert!(buffer.undo(), "undo #{} had nothing to undo", i + 1);
    }
}

/// Redo `n` times, asserting each redo did something
pub fn redo_n(buffer: &mut EditableTextBuffer, n: usize) {
    for i in 0..n {
        assert!(buffer.redo(), "redo #{} had nothing to redo", i + 1);
    }
}
