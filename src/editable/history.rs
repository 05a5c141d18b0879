//! Undo/redo action log for the editable text buffer.
//!
//! Every keystroke produces at most one `EditAction` per atomic mutation.
//! Undo moves the action to the redo stack unchanged and redo moves it back,
//! so the same value describes the forward edit for its whole lifetime.

use super::position::Position;

/// Opening smart-quote glyph
pub const OPEN_QUOTE: char = '«';
/// Closing smart-quote glyph
pub const CLOSE_QUOTE: char = '»';

/// One undoable atomic mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// `text` was inserted at `position`. Inverse: delete `text` at `position`.
    Insert {
        position: Position,
        /// Literal text that went into the document
        text: String,
        /// Glyph shown for `text` when it was typed in special mode
        glyph: Option<char>,
        /// `text` is a quote glyph produced by a `"` keystroke
        smart_quote: bool,
        caret_before: Position,
        caret_after: Position,
    },
    /// `text` was removed from `start..end`. Inverse: insert `text` at `start`.
    Delete {
        start: Position,
        end: Position,
        text: String,
        caret_before: Position,
        caret_after: Position,
    },
}

impl EditAction {
    pub fn insert(position: Position, text: impl Into<String>, caret_after: Position) -> Self {
        Self::Insert {
            position,
            text: text.into(),
            glyph: None,
            smart_quote: false,
            caret_before: position,
            caret_after,
        }
    }

    pub fn delete(
        start: Position,
        end: Position,
        text: impl Into<String>,
        caret_before: Position,
    ) -> Self {
        Self::Delete {
            start,
            end,
            text: text.into(),
            caret_before,
            caret_after: start,
        }
    }

    /// Record the glyph displayed for an insert (no-op for deletes)
    pub fn with_glyph(mut self, shown: char) -> Self {
        if let Self::Insert { glyph, .. } = &mut self {
            *glyph = Some(shown);
        }
        self
    }

    /// Mark an insert as a smart quote (no-op for deletes)
    pub fn as_smart_quote(mut self) -> Self {
        if let Self::Insert { smart_quote, .. } = &mut self {
            *smart_quote = true;
        }
        self
    }

    /// The literal text carried by this action
    pub fn text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Delete { text, .. } => text,
        }
    }

    pub fn caret_before(&self) -> Position {
        match self {
            Self::Insert { caret_before, .. } | Self::Delete { caret_before, .. } => *caret_before,
        }
    }

    pub fn caret_after(&self) -> Position {
        match self {
            Self::Insert { caret_after, .. } | Self::Delete { caret_after, .. } => *caret_after,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }

    /// True if this action inserted a smart quote. A « or » typed or pasted
    /// literally does not count.
    pub fn is_quote_insert(&self) -> bool {
        matches!(self, Self::Insert { smart_quote: true, .. })
    }
}

/// Undo and redo stacks.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditAction>,
    redo_stack: Vec<EditAction>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Create a new edit history with default max size
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    /// Create a new edit history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Push a new action onto the undo stack (clears redo stack)
    pub fn push(&mut self, action: EditAction) {
        self.redo_stack.clear();
        self.undo_stack.push(action);

        // Trim if exceeded max size
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the most recent action; the caller must finish with `push_redo`
    pub fn pop_undo(&mut self) -> Option<EditAction> {
        self.undo_stack.pop()
    }

    /// Pop the most recently undone action; the caller must finish with `push_undone`
    pub fn pop_redo(&mut self) -> Option<EditAction> {
        self.redo_stack.pop()
    }

    /// Park an undone action on the redo stack
    pub fn push_redo(&mut self, action: EditAction) {
        self.redo_stack.push(action);
    }

    /// Return a redone action to the undo stack without touching redo
    pub fn push_undone(&mut self, action: EditAction) {
        self.undo_stack.push(action);
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(column: usize) -> Position {
        Position::new(1, column)
    }

    #[test]
    fn test_insert_action_carets() {
        let action = EditAction::insert(at(5), "x", at(6));
        assert_eq!(action.caret_before(), at(5));
        assert_eq!(action.caret_after(), at(6));
        assert_eq!(action.text(), "x");
        assert!(action.is_insert());
    }

    #[test]
    fn test_delete_action_carets() {
        // Backspace: caret was after the deleted char
        let action = EditAction::delete(at(2), at(3), "c", at(3));
        assert_eq!(action.caret_before(), at(3));
        assert_eq!(action.caret_after(), at(2));
        assert!(!action.is_insert());
    }

    #[test]
    fn test_glyph_only_applies_to_inserts() {
        let insert = EditAction::insert(at(0), " ", at(1)).with_glyph('·');
        assert!(matches!(insert, EditAction::Insert { glyph: Some('·'), .. }));

        let delete = EditAction::delete(at(0), at(1), " ", at(1)).with_glyph('·');
        assert_eq!(delete, EditAction::delete(at(0), at(1), " ", at(1)));
    }

    #[test]
    fn test_quote_insert_detection() {
        assert!(EditAction::insert(at(0), "«", at(1)).as_smart_quote().is_quote_insert());
        assert!(EditAction::insert(at(0), "»", at(1)).as_smart_quote().is_quote_insert());
        assert!(!EditAction::insert(at(0), "«", at(1)).is_quote_insert());
        assert!(!EditAction::delete(at(0), at(1), "«", at(1)).as_smart_quote().is_quote_insert());
    }

    #[test]
    fn test_history_moves_actions_unchanged() {
        let mut history = EditHistory::new();
        let first = EditAction::insert(at(0), "a", at(1));
        let second = EditAction::insert(at(1), "b", at(2));
        history.push(first);
        history.push(second.clone());
        assert_eq!(history.undo_count(), 2);
        assert!(!history.can_redo());

        let undone = history.pop_undo().unwrap();
        assert_eq!(undone, second);
        history.push_redo(undone);
        assert!(history.can_redo());

        let redone = history.pop_redo().unwrap();
        assert_eq!(redone, second);
        history.push_undone(redone);
        assert_eq!(history.undo_count(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_push_clears_redo() {
        let mut history = EditHistory::new();
        history.push(EditAction::insert(at(0), "a", at(1)));
        let action = history.pop_undo().unwrap();
        history.push_redo(action);
        assert!(history.can_redo());

        history.push(EditAction::insert(at(0), "b", at(1)));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_max_size() {
        let mut history = EditHistory::with_max_size(3);
        for i in 0..5 {
            history.push(EditAction::insert(at(i), i.to_string(), at(i + 1)));
        }
        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.pop_undo().map(|a| a.text().to_string()), Some("4".to_string()));
    }
}
