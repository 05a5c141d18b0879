//! Smart-quote state: which glyph the next `"` keystroke becomes.
//!
//! Every inserted smart quote is remembered with its char offset. Offsets are
//! kept in step with the document: inserting text before an entry moves it
//! right, deleting a range drops the entries inside and moves later ones left.

use std::ops::Range;

use super::buffer::TextBuffer;
use super::history::{CLOSE_QUOTE, OPEN_QUOTE};
use super::position::Position;

/// One inserted smart quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteEntry {
    /// Char offset of the glyph in the literal document
    pub offset: usize,
    pub glyph: char,
}

/// Inserted smart quotes, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteState {
    entries: Vec<QuoteEntry>,
}

impl QuoteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a quote glyph that now sits at `offset`
    pub fn record(&mut self, offset: usize, glyph: char) {
        self.entries.push(QuoteEntry { offset, glyph });
    }

    /// Number of recorded quotes strictly before `offset`
    pub fn count_before(&self, offset: usize) -> usize {
        self.entries.iter().filter(|e| e.offset < offset).count()
    }

    /// Account for `len` chars inserted at `offset`
    pub fn shift_for_insert(&mut self, offset: usize, len: usize) {
        for entry in &mut self.entries {
            if entry.offset >= offset {
                entry.offset += len;
            }
        }
    }

    /// Account for `range` being deleted. Returns how many entries were dropped.
    pub fn remove_range(&mut self, range: Range<usize>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.offset < range.start || e.offset >= range.end);
        let removed = range.end.saturating_sub(range.start);
        for entry in &mut self.entries {
            if entry.offset >= range.end {
                entry.offset -= removed;
            }
        }
        before - self.entries.len()
    }

    pub fn entries(&self) -> &[QuoteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as `(position, glyph)` pairs resolved against `buffer`
    pub fn positions<B: TextBuffer>(&self, buffer: &B) -> Vec<(Position, char)> {
        self.entries
            .iter()
            .map(|e| (buffer.offset_to_position(e.offset), e.glyph))
            .collect()
    }
}

/// Choose the glyph a `"` typed at `offset` turns into.
///
/// Preceding whitespace (or the document start) always opens. Otherwise the
/// parity of recorded quotes before `offset` decides: odd closes, even opens.
pub fn next_quote_glyph<B: TextBuffer>(buffer: &B, quotes: &QuoteState, offset: usize) -> char {
    let prev = offset
        .checked_sub(1)
        .and_then(|prev| buffer.char_at_offset(prev));
    match prev {
        None | Some(' ' | '\t' | '\n') => OPEN_QUOTE,
        Some(_) if quotes.count_before(offset) % 2 == 1 => CLOSE_QUOTE,
        Some(_) => OPEN_QUOTE,
    }
}
