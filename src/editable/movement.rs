//! Caret navigation for keys the buffer does not consume.
//!
//! The host calls `move_caret` when `handle_key_press` returns false. Up/Down
//! clamp the column to the target line; no desired column is remembered.

use super::buffer::TextBuffer;
use super::key::{Key, KeyEvent};
use super::position::Position;
use super::text_buffer::EditableTextBuffer;

/// Lines moved by PageUp/PageDown
pub const PAGE_LINES: usize = 20;

impl EditableTextBuffer {
    /// Move the caret for a navigation key. Shift extends the selection.
    /// Returns false for keys that are not navigation keys.
    pub fn handle_navigation(&mut self, event: KeyEvent) -> bool {
        if event.modifiers.is_chord() {
            return false;
        }
        self.move_caret(event.key, event.modifiers.shift())
    }

    pub fn move_caret(&mut self, key: Key, extend_selection: bool) -> bool {
        if !key.is_navigation() {
            return false;
        }

        let selection = self.selection();
        // Left/Right on a selection without Shift collapse to its edge
        if !extend_selection && !selection.is_empty() {
            match key {
                Key::Left => {
                    self.set_caret(selection.start());
                    return true;
                }
                Key::Right => {
                    self.set_caret(selection.end());
                    return true;
                }
                _ => {}
            }
        }

        let doc = self.document();
        let caret = selection.head;
        let target = match key {
            Key::Left => step_left(doc, caret),
            Key::Right => step_right(doc, caret),
            Key::Up => vertical(doc, caret, -1),
            Key::Down => vertical(doc, caret, 1),
            Key::PageUp => vertical(doc, caret, -(PAGE_LINES as isize)),
            Key::PageDown => vertical(doc, caret, PAGE_LINES as isize),
            Key::Home => Position::new(caret.line, 0),
            Key::End => Position::new(caret.line, doc.line_length(caret.line)),
            _ => return false,
        };

        if extend_selection {
            self.selection_mut().extend_to(target);
        } else {
            self.set_caret(target);
        }
        true
    }
}

fn step_left<B: TextBuffer>(doc: &B, caret: Position) -> Position {
    if caret.column > 0 {
        Position::new(caret.line, caret.column - 1)
    } else if caret.line > 1 {
        Position::new(caret.line - 1, doc.line_length(caret.line - 1))
    } else {
        caret
    }
}

fn step_right<B: TextBuffer>(doc: &B, caret: Position) -> Position {
    if caret.column < doc.line_length(caret.line) {
        Position::new(caret.line, caret.column + 1)
    } else if caret.line < doc.line_count() {
        Position::new(caret.line + 1, 0)
    } else {
        caret
    }
}

fn vertical<B: TextBuffer>(doc: &B, caret: Position, delta: isize) -> Position {
    let line = caret
        .line
        .saturating_add_signed(delta)
        .clamp(1, doc.line_count());
    Position::new(line, caret.column.min(doc.line_length(line)))
}
