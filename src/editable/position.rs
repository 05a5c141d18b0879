//! Position type for the editable text buffer.
//!
//! Lines are 1-based and columns are 0-based, matching the `line.column`
//! addressing used by native text widgets. `Position::START` is `1.0`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in the text buffer (1-based line, 0-based column).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Document start, `1.0`
    pub const START: Position = Position { line: 1, column: 0 };

    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Zero-based line index, used for rope access
    pub const fn line_index(&self) -> usize {
        self.line.saturating_sub(1)
    }

    /// Build a position from a zero-based line index
    pub const fn from_line_index(line_index: usize, column: usize) -> Self {
        Self {
            line: line_index + 1,
            column,
        }
    }

    pub const fn is_start(&self) -> bool {
        self.line <= 1 && self.column == 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}
