//! Visible-whitespace rendering.
//!
//! In special mode every space, tab and newline is shown as a glyph:
//! space → `·`, tab → `→`, newline → `¶` followed by the real line break.
//! Each whitespace char renders as exactly one glyph char and `¶` sits at the
//! end of its own line, so a literal `Position` addresses the same cell in the
//! rendered text.

use std::collections::BTreeMap;

use super::position::Position;

pub const SPACE_GLYPH: char = '·';
pub const TAB_GLYPH: char = '→';
pub const NEWLINE_GLYPH: char = '¶';

/// Rendered glyph position → literal char it stands for
pub type DisplayCharIndex = BTreeMap<Position, char>;

/// Fixed mapping between literal whitespace and display glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialCharMap;

impl SpecialCharMap {
    /// Glyph for a literal whitespace char
    pub const fn glyph_for(ch: char) -> Option<char> {
        match ch {
            ' ' => Some(SPACE_GLYPH),
            '\t' => Some(TAB_GLYPH),
            '\n' => Some(NEWLINE_GLYPH),
            _ => None,
        }
    }

    /// Literal char a glyph stands for
    pub const fn literal_for(glyph: char) -> Option<char> {
        match glyph {
            SPACE_GLYPH => Some(' '),
            TAB_GLYPH => Some('\t'),
            NEWLINE_GLYPH => Some('\n'),
            _ => None,
        }
    }

    /// Text emitted into the display for a literal whitespace char
    pub const fn display_str(ch: char) -> Option<&'static str> {
        match ch {
            ' ' => Some("·"),
            '\t' => Some("→"),
            '\n' => Some("¶\n"),
            _ => None,
        }
    }

    pub const fn is_special(ch: char) -> bool {
        matches!(ch, ' ' | '\t' | '\n')
    }
}

/// Replace every literal whitespace char with its display form
pub fn to_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match SpecialCharMap::display_str(ch) {
            Some(shown) => out.push_str(shown),
            None => out.push(ch),
        }
    }
    out
}

/// Reverse `to_glyphs`: `·` → space, `→` → tab, `¶` markers stripped
pub fn from_glyphs(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            SPACE_GLYPH => Some(' '),
            TAB_GLYPH => Some('\t'),
            NEWLINE_GLYPH => None,
            other => Some(other),
        })
        .collect()
}

/// What the host widget shows for a buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayText {
    text: String,
    /// Positions tagged "special" (dimmed glyph style)
    special: Vec<Position>,
    index: DisplayCharIndex,
}

impl DisplayText {
    /// Rebuild the display from the literal text, left to right
    pub fn render(literal: &str) -> Self {
        let mut text = String::with_capacity(literal.len() + literal.len() / 4);
        let mut special = Vec::new();
        let mut index = DisplayCharIndex::new();
        let mut pos = Position::START;

        for ch in literal.chars() {
            match SpecialCharMap::display_str(ch) {
                Some(shown) => {
                    text.push_str(shown);
                    special.push(pos);
                    index.insert(pos, ch);
                }
                None => text.push(ch),
            }
            if ch == '\n' {
                pos = Position::new(pos.line + 1, 0);
            } else {
                pos.column += 1;
            }
        }

        Self {
            text,
            special,
            index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Positions carrying the "special" tag, in document order
    pub fn special_positions(&self) -> &[Position] {
        &self.special
    }

    pub fn char_index(&self) -> &DisplayCharIndex {
        &self.index
    }

    pub fn is_special(&self, pos: Position) -> bool {
        self.index.contains_key(&pos)
    }

    /// Literal char shown by the glyph at `pos`, if it is a glyph
    pub fn literal_at(&self, pos: Position) -> Option<char> {
        self.index.get(&pos).copied()
    }

    /// Reconstruct the literal text using the display char index
    pub fn to_literal(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut pos = Position::START;
        let mut after_newline_glyph = false;

        for ch in self.text.chars() {
            if ch == '\n' {
                if !after_newline_glyph {
                    out.push('\n');
                }
                after_newline_glyph = false;
                pos = Position::new(pos.line + 1, 0);
                continue;
            }
            match self.index.get(&pos) {
                Some('\n') => {
                    out.push('\n');
                    after_newline_glyph = true;
                }
                Some(&literal) => out.push(literal),
                None => out.push(ch),
            }
            pos.column += 1;
        }
        out
    }
}
