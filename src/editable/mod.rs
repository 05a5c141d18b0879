//! Keystroke-intercepting text buffer for the Natatnik editor.
//!
//! The host UI forwards every key press to [`EditableTextBuffer::handle_key_press`].
//! The buffer is the only authority on document mutation: it inserts and
//! deletes one char at a time, turns `"` into « or », keeps its own undo/redo
//! log and, in special mode, renders whitespace as visible glyphs.
//!
//! # Architecture
//!
//! - [`Position`]: `line.column` address (1-based line, 0-based column)
//! - [`TextBuffer`] / [`TextBufferMut`] and [`RopeBuffer`]: literal document storage
//! - [`Selection`]: anchor/head pair; the head is the caret
//! - [`EditAction`] / [`EditHistory`]: undo and redo stacks
//! - [`QuoteState`]: smart quotes inserted so far, for opening/closing parity
//! - [`DisplayText`] / [`SpecialCharMap`]: whitespace glyph rendering
//! - [`KeyEvent`]: logical key identity delivered by the host
//!
//! # Example
//!
//! ```
//! use natatnik::editable::{EditableTextBuffer, KeyEvent};
//!
//! let mut buffer = EditableTextBuffer::new();
//! for event in KeyEvent::parse_script("a\"b").unwrap() {
//!     buffer.handle_key_press(event);
//! }
//! assert_eq!(buffer.text(), "a«b");
//!
//! buffer.undo();
//! assert_eq!(buffer.text(), "a«");
//! ```

mod buffer;
pub mod glyphs;
mod history;
mod key;
mod movement;
mod position;
mod quotes;
mod selection;
mod text_buffer;

pub use buffer::{RopeBuffer, TextBuffer, TextBufferMut};
pub use glyphs::{DisplayCharIndex, DisplayText, SpecialCharMap};
pub use history::{EditAction, EditHistory, CLOSE_QUOTE, OPEN_QUOTE};
pub use key::{Key, KeyEvent, KeyParseError, Modifiers};
pub use movement::PAGE_LINES;
pub use position::Position;
pub use quotes::{next_quote_glyph, QuoteEntry, QuoteState};
pub use selection::Selection;
pub use text_buffer::{DeleteDirection, EditableTextBuffer};
