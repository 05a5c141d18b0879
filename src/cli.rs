//! Command-line argument parsing
//!
//! Supports:
//! - Rendering a file with visible whitespace glyphs
//! - Replaying a key script against a file
//! - Driving a tab session from stdin

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::session::CloseChoice;

/// Text editor core with visible whitespace, undo log and smart quotes
#[derive(Parser, Debug)]
#[command(name = "natatnik", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print a file as the editor displays it
    Render(RenderArgs),

    /// Type a key script into a file's buffer and print the result
    Replay(ReplayArgs),

    /// Restore the saved session and apply key scripts read from stdin,
    /// one line per script
    Session(SessionArgs),
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct RenderArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Show spaces, tabs and newlines as glyphs
    #[arg(short = 's', long)]
    pub show_special: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ReplayArgs {
    /// Starting document; a missing file starts empty
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key script, e.g. `a"b<BS><Enter><C-z>`
    #[arg(short = 'k', long, value_name = "SCRIPT")]
    pub keys: String,

    /// Write the literal result here instead of only printing it
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Show spaces, tabs and newlines as glyphs
    #[arg(short = 's', long)]
    pub show_special: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct SessionArgs {
    /// Characters per line used for the visual line count
    #[arg(long, value_name = "WIDTH", default_value_t = 80)]
    pub lines: usize,
}

/// Choice for a `:close [discard|PATH]` session line. A bare `:close`
/// cancels, so an untitled tab is only dropped when asked explicitly.
pub fn parse_close_choice(arg: &str) -> CloseChoice {
    match arg.trim() {
        "" => CloseChoice::Cancel,
        "discard" => CloseChoice::Discard,
        path => CloseChoice::SaveAs(PathBuf::from(path)),
    }
}
