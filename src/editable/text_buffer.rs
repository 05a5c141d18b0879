//! EditableTextBuffer - the keystroke-intercepting document core.
//!
//! Every key event the host forwards becomes at most one atomic edit: insert
//! a char, delete a char, delete a selection or substitute a smart quote.
//! Each edit pushes its `EditAction`, clears the redo stack and re-renders
//! the glyph display when special mode is on. The buffer never fails: edge
//! cases such as Backspace at `1.0` or undo on an empty log are silent no-ops.

use super::buffer::{RopeBuffer, TextBuffer, TextBufferMut};
use super::glyphs::{DisplayText, SpecialCharMap};
use super::history::{EditAction, EditHistory};
use super::key::{Key, KeyEvent};
use super::position::Position;
use super::quotes::{next_quote_glyph, QuoteState};
use super::selection::Selection;

/// Which side of the caret a single-char delete removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDirection {
    /// Backspace: the char before the caret
    Backward,
    /// Delete: the char at the caret
    Forward,
}

/// One open document with its caret, undo log, quote state and display.
#[derive(Debug, Clone)]
pub struct EditableTextBuffer {
    /// Literal text
    buffer: RopeBuffer,
    /// Selection; `head` is the caret
    selection: Selection,
    history: EditHistory,
    quotes: QuoteState,
    show_special: bool,
    /// Glyph rendering, present only in special mode
    display: Option<DisplayText>,
}

impl Default for EditableTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditableTextBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a buffer holding `text`, caret at `1.0`
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: RopeBuffer::from_text(text),
            selection: Selection::collapsed(Position::START),
            history: EditHistory::new(),
            quotes: QuoteState::new(),
            show_special: false,
            display: None,
        }
    }

    /// Builder: start in special (visible whitespace) mode
    pub fn with_special_mode(mut self, show: bool) -> Self {
        self.toggle_special_mode(show);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Literal text, independent of the display mode
    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn document(&self) -> &RopeBuffer {
        &self.buffer
    }

    pub fn caret(&self) -> Position {
        self.selection.head
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected literal text (empty string if no selection)
    pub fn selected_text(&self) -> String {
        let (start, end) = self.selection_offsets();
        self.buffer.slice(start..end)
    }

    pub fn show_special(&self) -> bool {
        self.show_special
    }

    /// Glyph rendering; `None` in plain mode
    pub fn display(&self) -> Option<&DisplayText> {
        self.display.as_ref()
    }

    /// What the host widget should show
    pub fn display_text(&self) -> String {
        match &self.display {
            Some(display) => display.text().to_string(),
            None => self.text(),
        }
    }

    pub fn quote_state(&self) -> &QuoteState {
        &self.quotes
    }

    /// Recorded smart quotes as `(position, glyph)`
    pub fn quote_positions(&self) -> Vec<(Position, char)> {
        self.quotes.positions(&self.buffer)
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    // =========================================================================
    // Caret and selection (driven by the host)
    // =========================================================================

    /// Move the caret, dropping any selection
    pub fn set_caret(&mut self, pos: Position) {
        let pos = self.buffer.clamp_position(pos);
        self.selection = Selection::collapsed(pos);
    }

    pub fn set_selection(&mut self, anchor: Position, head: Position) {
        self.selection = Selection::new(
            self.buffer.clamp_position(anchor),
            self.buffer.clamp_position(head),
        );
    }

    pub(super) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.collapse();
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(Position::START, self.buffer.end_position());
    }

    // =========================================================================
    // Key dispatch
    // =========================================================================

    /// Apply one key event. Returns true when the buffer consumed the key and
    /// the host must suppress its default insertion/deletion.
    ///
    /// Named editing keys are consumed whatever modifiers are held; chords on
    /// character keys are left to the host as shortcuts.
    pub fn handle_key_press(&mut self, event: KeyEvent) -> bool {
        match event.key {
            Key::Space => self.insert_special_char(' '),
            Key::Tab => self.insert_special_char('\t'),
            Key::Enter => self.insert_special_char('\n'),
            Key::Backspace => {
                self.delete_one_unit(DeleteDirection::Backward);
            }
            Key::Delete => {
                self.delete_one_unit(DeleteDirection::Forward);
            }
            Key::Char(_) if event.modifiers.is_chord() => return false,
            Key::Char(ch) if SpecialCharMap::is_special(ch) => self.insert_special_char(ch),
            Key::Char('"') => self.insert_smart_quote(),
            Key::Char(ch) if !ch.is_control() => self.insert_plain_char(ch),
            _ => return false,
        }
        true
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Insert an ordinary printable char at the caret
    pub fn insert_plain_char(&mut self, ch: char) {
        self.delete_selection_recorded();
        let mut text = [0u8; 4];
        self.insert_recorded(ch.encode_utf8(&mut text), None, false);
        self.render_special_glyphs();
    }

    /// Insert a space, tab or newline at the caret
    pub fn insert_special_char(&mut self, literal: char) {
        let Some(glyph) = SpecialCharMap::glyph_for(literal) else {
            self.insert_plain_char(literal);
            return;
        };
        self.delete_selection_recorded();
        let shown = self.show_special.then_some(glyph);
        let mut text = [0u8; 4];
        self.insert_recorded(literal.encode_utf8(&mut text), shown, false);
        self.render_special_glyphs();
    }

    /// Insert « or » at the caret depending on context
    pub fn insert_smart_quote(&mut self) {
        self.delete_selection_recorded();
        let offset = self.caret_offset();
        let glyph = next_quote_glyph(&self.buffer, &self.quotes, offset);
        let mut text = [0u8; 4];
        self.insert_recorded(glyph.encode_utf8(&mut text), None, true);
        self.quotes.record(offset, glyph);
        tracing::debug!(
            "Smart quote {} at {} ({} recorded)",
            glyph,
            self.buffer.offset_to_position(offset),
            self.quotes.len()
        );
        self.render_special_glyphs();
    }

    /// Delete the selection, or one char before/at the caret.
    /// Returns false when nothing was deleted (document edge).
    pub fn delete_one_unit(&mut self, direction: DeleteDirection) -> bool {
        if self.delete_selection_recorded() {
            self.render_special_glyphs();
            return true;
        }

        let caret = self.caret();
        let offset = self.caret_offset();
        let range = match direction {
            DeleteDirection::Backward if offset > 0 => offset - 1..offset,
            DeleteDirection::Forward if offset < self.buffer.len_chars() => offset..offset + 1,
            _ => {
                tracing::trace!("Delete {:?} at {} is a no-op", direction, caret);
                return false;
            }
        };

        let start = self.buffer.offset_to_position(range.start);
        let end = self.buffer.offset_to_position(range.end);
        let deleted = self.buffer.slice(range.clone());
        self.buffer.remove(range.clone());
        self.quotes.remove_range(range);
        self.selection = Selection::collapsed(start);
        self.history
            .push(EditAction::delete(start, end, deleted, caret));
        self.render_special_glyphs();
        true
    }

    // =========================================================================
    // Clipboard helpers
    // =========================================================================

    /// Selected literal text, if any
    pub fn copy(&self) -> Option<String> {
        self.has_selection().then(|| self.selected_text())
    }

    /// Copy and delete the selection as one undo entry
    pub fn cut(&mut self) -> Option<String> {
        let text = self.copy()?;
        self.delete_selection_recorded();
        self.render_special_glyphs();
        Some(text)
    }

    /// Replace the selection with `text`, inserted literally as one entry
    pub fn paste(&mut self, text: &str) -> bool {
        let text = crate::io::normalize_line_endings(text.to_string());
        if text.is_empty() {
            return false;
        }
        self.delete_selection_recorded();
        self.insert_recorded(&text, None, false);
        self.render_special_glyphs();
        true
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// Revert the most recent action. Returns false if there is none.
    ///
    /// Quote glyphs brought back by undoing a deletion are not re-recorded in
    /// the quote state, so parity after such an undo only counts quotes typed
    /// since.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.pop_undo() else {
            return false;
        };

        match &action {
            EditAction::Insert { position, text, .. } => {
                let start = self.buffer.position_to_offset(*position);
                let end = start + text.chars().count();
                self.buffer.remove(start..end);
                self.quotes.remove_range(start..end);
            }
            EditAction::Delete { start, text, .. } => {
                let offset = self.buffer.position_to_offset(*start);
                self.buffer.insert(offset, text);
                self.quotes.shift_for_insert(offset, text.chars().count());
            }
        }

        self.set_caret(action.caret_before());
        tracing::debug!(
            "Undo {} {:?} (undo: {}, redo: {})",
            if action.is_insert() { "insert" } else { "delete" },
            action.text(),
            self.history.undo_count(),
            self.history.redo_count() + 1
        );
        self.history.push_redo(action);
        self.render_special_glyphs();
        true
    }

    /// Re-apply the most recently undone action. Returns false if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.pop_redo() else {
            return false;
        };

        match &action {
            EditAction::Insert { position, text, .. } => {
                let offset = self.buffer.position_to_offset(*position);
                self.buffer.insert(offset, text);
                self.quotes.shift_for_insert(offset, text.chars().count());
                if action.is_quote_insert() {
                    if let Some(glyph) = text.chars().next() {
                        self.quotes.record(offset, glyph);
                    }
                }
            }
            EditAction::Delete { start, text, .. } => {
                let start = self.buffer.position_to_offset(*start);
                let end = start + text.chars().count();
                self.buffer.remove(start..end);
                self.quotes.remove_range(start..end);
            }
        }

        self.set_caret(action.caret_after());
        tracing::debug!(
            "Redo {} {:?} (undo: {}, redo: {})",
            if action.is_insert() { "insert" } else { "delete" },
            action.text(),
            self.history.undo_count() + 1,
            self.history.redo_count()
        );
        self.history.push_undone(action);
        self.render_special_glyphs();
        true
    }

    // =========================================================================
    // Special-character display
    // =========================================================================

    /// Rebuild the glyph display from the literal text. No-op in plain mode.
    ///
    /// Caret and selection are kept as positions into the literal text; the
    /// rendering maps each literal cell to the same display cell, so they need
    /// no adjustment.
    pub fn render_special_glyphs(&mut self) {
        if !self.show_special {
            return;
        }
        self.display = Some(DisplayText::render(&self.buffer.content()));
    }

    /// Switch between plain and special display
    pub fn toggle_special_mode(&mut self, show: bool) {
        let caret = self.caret();
        self.show_special = show;
        if show {
            self.render_special_glyphs();
        } else {
            self.display = None;
        }
        tracing::debug!("Special mode {} (caret {})", if show { "on" } else { "off" }, caret);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn caret_offset(&self) -> usize {
        self.buffer.position_to_offset(self.selection.head)
    }

    fn selection_offsets(&self) -> (usize, usize) {
        (
            self.buffer.position_to_offset(self.selection.start()),
            self.buffer.position_to_offset(self.selection.end()),
        )
    }

    /// Delete the active selection as one `Delete` entry
    fn delete_selection_recorded(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }

        let caret_before = self.caret();
        let start_pos = self.selection.start();
        let end_pos = self.selection.end();
        let (start, end) = self.selection_offsets();
        let deleted = self.buffer.slice(start..end);
        self.buffer.remove(start..end);
        let dropped = self.quotes.remove_range(start..end);
        self.selection = Selection::collapsed(start_pos);

        tracing::debug!(
            "Deleted selection {}..{} ({} chars, {} quotes dropped)",
            start_pos,
            end_pos,
            end - start,
            dropped
        );
        self.history
            .push(EditAction::delete(start_pos, end_pos, deleted, caret_before));
        true
    }

    /// Insert literal `text` at the caret as one `Insert` entry
    fn insert_recorded(&mut self, text: &str, glyph: Option<char>, smart_quote: bool) {
        let position = self.caret();
        let offset = self.caret_offset();
        let len = text.chars().count();

        self.buffer.insert(offset, text);
        self.quotes.shift_for_insert(offset, len);
        let caret_after = self.buffer.offset_to_position(offset + len);
        self.selection = Selection::collapsed(caret_after);

        let mut action = EditAction::insert(position, text, caret_after);
        if let Some(shown) = glyph {
            action = action.with_glyph(shown);
        }
        if smart_quote {
            action = action.as_smart_quote();
        }
        tracing::debug!("Insert {:?} at {}", text, position);
        self.history.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::history::{CLOSE_QUOTE, OPEN_QUOTE};

    fn type_keys(buf: &mut EditableTextBuffer, script: &str) {
        for event in KeyEvent::parse_script(script).unwrap() {
            buf.handle_key_press(event);
        }
    }

    #[test]
    fn test_plain_insert() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "abc");
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.caret(), Position::new(1, 3));
        assert_eq!(buf.undo_count(), 3);
    }

    #[test]
    fn test_special_keys_insert_literals() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "a<Space>b<Tab>c<Enter>d");
        assert_eq!(buf.text(), "a b\tc\nd");
        assert_eq!(buf.caret(), Position::new(2, 1));
    }

    #[test]
    fn test_non_editing_keys_not_consumed() {
        let mut buf = EditableTextBuffer::from_text("ab");
        assert!(!buf.handle_key_press(KeyEvent::key(Key::Left)));
        assert!(!buf.handle_key_press(KeyEvent::key(Key::Escape)));
        assert!(!buf.handle_key_press(KeyEvent::key(Key::F(2))));
        assert!(!buf.handle_key_press(KeyEvent::ctrl('z')));
        assert!(!buf.handle_key_press(KeyEvent::char('\u{1a}')));
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.undo_count(), 0);
    }

    #[test]
    fn test_chorded_editing_keys_consumed() {
        use crate::editable::key::Modifiers;

        let mut buf = EditableTextBuffer::from_text("abc");
        buf.set_caret(Position::new(1, 2));

        assert!(buf.handle_key_press(KeyEvent::new(Key::Backspace, Modifiers::CTRL)));
        assert_eq!(buf.text(), "ac");
        assert!(buf.handle_key_press(KeyEvent::new(Key::Delete, Modifiers::ALT)));
        assert_eq!(buf.text(), "a");
        assert!(buf.handle_key_press(KeyEvent::new(Key::Enter, Modifiers::CTRL)));
        assert!(buf.handle_key_press(KeyEvent::new(Key::Tab, Modifiers::META)));
        assert!(buf.handle_key_press(KeyEvent::new(
            Key::Space,
            Modifiers::CTRL | Modifiers::SHIFT
        )));
        assert_eq!(buf.text(), "a\n\t ");
        assert_eq!(buf.undo_count(), 5);

        // Character chords stay with the host
        assert!(!buf.handle_key_press(KeyEvent::new(Key::Char(' '), Modifiers::CTRL)));
        assert_eq!(buf.text(), "a\n\t ");
    }

    #[test]
    fn test_editing_keys_consumed_even_at_edges() {
        let mut buf = EditableTextBuffer::new();
        assert!(buf.handle_key_press(KeyEvent::key(Key::Backspace)));
        assert!(buf.handle_key_press(KeyEvent::key(Key::Delete)));
        assert_eq!(buf.undo_count(), 0);
    }

    #[test]
    fn test_insert_replaces_selection_with_two_entries() {
        let mut buf = EditableTextBuffer::from_text("hello world");
        buf.set_selection(Position::new(1, 0), Position::new(1, 5));
        buf.insert_plain_char('X');
        assert_eq!(buf.text(), "X world");
        assert_eq!(buf.caret(), Position::new(1, 1));
        assert_eq!(buf.undo_count(), 2);

        buf.undo();
        assert_eq!(buf.text(), " world");
        buf.undo();
        assert_eq!(buf.text(), "hello world");
        assert_eq!(buf.caret(), Position::new(1, 5));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut buf = EditableTextBuffer::from_text("abc");
        buf.set_caret(Position::new(1, 2));
        assert!(buf.delete_one_unit(DeleteDirection::Backward));
        assert_eq!(buf.text(), "ac");
        assert_eq!(buf.caret(), Position::new(1, 1));

        assert!(buf.delete_one_unit(DeleteDirection::Forward));
        assert_eq!(buf.text(), "a");
        assert_eq!(buf.caret(), Position::new(1, 1));
        assert!(!buf.delete_one_unit(DeleteDirection::Forward));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buf = EditableTextBuffer::from_text("ab\ncd");
        buf.set_caret(Position::new(2, 0));
        buf.delete_one_unit(DeleteDirection::Backward);
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.caret(), Position::new(1, 2));

        buf.undo();
        assert_eq!(buf.text(), "ab\ncd");
        assert_eq!(buf.caret(), Position::new(2, 0));
    }

    #[test]
    fn test_smart_quotes_alternate() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "\"\"");
        assert_eq!(buf.text(), "«»");
        type_keys(&mut buf, "<Space>word<Space>\"");
        assert_eq!(buf.text(), "«» word «");
        assert_eq!(buf.quote_state().len(), 3);
    }

    #[test]
    fn test_quote_positions_follow_edits() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "a\"b");
        buf.set_caret(Position::START);
        type_keys(&mut buf, "xy");
        assert_eq!(buf.text(), "xya«b");
        assert_eq!(buf.quote_positions(), vec![(Position::new(1, 3), OPEN_QUOTE)]);
    }

    #[test]
    fn test_deleting_quote_drops_entry() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "a\"");
        assert_eq!(buf.quote_state().len(), 1);
        type_keys(&mut buf, "<BS>");
        assert!(buf.quote_state().is_empty());
        // Parity reconsidered as if the quote never existed
        type_keys(&mut buf, "\"");
        assert_eq!(buf.text(), "a«");
    }

    #[test]
    fn test_undo_redo_quote_state() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "\"a\"");
        assert_eq!(buf.text(), "«a»");
        buf.undo();
        assert_eq!(buf.quote_state().len(), 1);
        buf.redo();
        assert_eq!(buf.quote_positions(), vec![
            (Position::new(1, 0), OPEN_QUOTE),
            (Position::new(1, 2), CLOSE_QUOTE),
        ]);
    }

    #[test]
    fn test_undo_of_quote_deletion_keeps_limitation() {
        let mut buf = EditableTextBuffer::new();
        type_keys(&mut buf, "\"a");
        buf.set_caret(Position::new(1, 1));
        type_keys(&mut buf, "<BS>");
        assert!(buf.quote_state().is_empty());
        buf.undo();
        assert_eq!(buf.text(), "«a");
        assert!(buf.quote_state().is_empty());
    }

    #[test]
    fn test_special_mode_records_glyph() {
        let mut buf = EditableTextBuffer::new().with_special_mode(true);
        type_keys(&mut buf, "a<Space>b");
        assert_eq!(buf.text(), "a b");
        assert_eq!(buf.display_text(), "a·b");
        assert_eq!(
            buf.display().unwrap().special_positions(),
            &[Position::new(1, 1)]
        );
    }

    #[test]
    fn test_toggle_special_mode_preserves_caret() {
        let mut buf = EditableTextBuffer::from_text("a b\nc");
        buf.set_caret(Position::new(2, 1));
        buf.toggle_special_mode(true);
        assert_eq!(buf.display_text(), "a·b¶\nc");
        assert_eq!(buf.caret(), Position::new(2, 1));
        buf.toggle_special_mode(false);
        assert_eq!(buf.display_text(), "a b\nc");
        assert!(buf.display().is_none());
        assert_eq!(buf.caret(), Position::new(2, 1));
    }

    #[test]
    fn test_render_is_noop_in_plain_mode() {
        let mut buf = EditableTextBuffer::from_text("a b");
        buf.render_special_glyphs();
        assert!(buf.display().is_none());
    }

    #[test]
    fn test_cut_copy_paste() {
        let mut buf = EditableTextBuffer::from_text("hello world");
        assert_eq!(buf.copy(), None);
        buf.set_selection(Position::new(1, 0), Position::new(1, 6));
        assert_eq!(buf.copy().as_deref(), Some("hello "));
        assert_eq!(buf.cut().as_deref(), Some("hello "));
        assert_eq!(buf.text(), "world");

        buf.set_caret(Position::new(1, 5));
        assert!(buf.paste(" \"hi\"\r\n"));
        assert_eq!(buf.text(), "world \"hi\"\n");
        assert!(buf.quote_state().is_empty());

        buf.undo();
        assert_eq!(buf.text(), "world");
    }

    #[test]
    fn test_select_all_then_type() {
        let mut buf = EditableTextBuffer::from_text("one\ntwo");
        buf.select_all();
        assert_eq!(buf.selected_text(), "one\ntwo");
        type_keys(&mut buf, "x");
        assert_eq!(buf.text(), "x");
    }

    #[test]
    fn test_set_caret_clamps() {
        let mut buf = EditableTextBuffer::from_text("ab");
        buf.set_caret(Position::new(5, 9));
        assert_eq!(buf.caret(), Position::new(1, 2));
    }
}
