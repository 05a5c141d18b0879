//! Natatnik - a keystroke-intercepting text editor core
//!
//! The [`editable`] module holds the document buffer: per-character undo/redo,
//! smart quotes and visible-whitespace rendering. The remaining modules are
//! the shell around it: settings, file I/O, tabs with autosave and the CLI.

pub mod cli;
pub mod config_paths;
pub mod editable;
pub mod io;
pub mod layout;
pub mod session;
pub mod settings;
pub mod tracing;

// Re-export commonly used types
pub use editable::{EditableTextBuffer, KeyEvent, Position};
pub use session::{CloseChoice, Session, Tab, TabId};
pub use settings::Settings;
