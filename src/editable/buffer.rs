//! Document storage for the editable text buffer.
//!
//! `TextBuffer` (read-only) and `TextBufferMut` (read-write) abstract over the
//! backing store so the edit logic only talks in char offsets and `Position`s.
//! `RopeBuffer` is the only implementation; it holds the literal text.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use super::position::Position;

/// Read-only view into a text buffer.
pub trait TextBuffer {
    /// Number of lines (always >= 1)
    fn line_count(&self) -> usize;

    /// Length of a line in characters, excluding the newline. Lines are 1-based.
    fn line_length(&self, line: usize) -> usize;

    /// Total length in characters
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Character at a char offset, None if out of bounds
    fn char_at_offset(&self, offset: usize) -> Option<char>;

    /// Line content without trailing newline. Lines are 1-based.
    fn line(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Convert a position to a char offset, clamping to the document
    fn position_to_offset(&self, pos: Position) -> usize;

    /// Convert a char offset to a position
    fn offset_to_position(&self, offset: usize) -> Position;

    /// Get slice of text as String (by character indices)
    fn slice(&self, range: Range<usize>) -> String;

    /// Get full content as String
    fn content(&self) -> String;

    /// Last valid position in the document
    fn end_position(&self) -> Position {
        self.offset_to_position(self.len_chars())
    }

    /// Clamp a position into the document
    fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.line_count());
        let column = pos.column.min(self.line_length(line));
        Position::new(line, column)
    }
}

/// Mutable buffer operations. Extends TextBuffer.
pub trait TextBufferMut: TextBuffer {
    /// Insert text at character offset
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove text in character range
    fn remove(&mut self, range: Range<usize>);
}

/// TextBuffer implementation wrapping ropey::Rope.
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a RopeBuffer from a string slice
    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    fn line_length(&self, line: usize) -> usize {
        let idx = line.saturating_sub(1);
        if line == 0 || idx >= self.rope.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(idx);
        let len = line_slice.len_chars();
        // Exclude trailing newline if present
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at_offset(&self, offset: usize) -> Option<char> {
        if offset >= self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char(offset))
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        let idx = line.checked_sub(1)?;
        if idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(idx).to_string();
        let trimmed = s.trim_end_matches('\n').to_string();
        Some(Cow::Owned(trimmed))
    }

    fn position_to_offset(&self, pos: Position) -> usize {
        let idx = pos.line_index();
        if idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(idx);
        line_start + pos.column.min(self.line_length(pos.line))
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.rope.len_chars());
        let idx = self.rope.char_to_line(clamped);
        let line_start = self.rope.line_to_char(idx);
        Position::from_line_index(idx, clamped - line_start)
    }

    fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }
}

impl TextBufferMut for RopeBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        let clamped = offset.min(self.len_chars());
        self.rope.insert(clamped, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }
}
