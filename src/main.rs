use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use natatnik::cli::{parse_close_choice, CliArgs, Command, RenderArgs, ReplayArgs, SessionArgs};
use natatnik::editable::{EditableTextBuffer, KeyEvent};
use natatnik::session::{dispatch_key, Session};
use natatnik::{config_paths, io as doc_io, Settings};

fn main() -> Result<()> {
    natatnik::tracing::init();

    let args = CliArgs::parse();
    match args.command {
        Command::Render(args) => render(args),
        Command::Replay(args) => replay(args),
        Command::Session(args) => run_session(args),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let content = doc_io::read_document(&args.file)?;
    let buffer = EditableTextBuffer::from_text(&content).with_special_mode(args.show_special);
    println!("{}", buffer.display_text());
    Ok(())
}

fn replay(args: ReplayArgs) -> Result<()> {
    let content = if args.file.exists() {
        doc_io::read_document(&args.file)?
    } else {
        String::new()
    };
    let events = KeyEvent::parse_script(&args.keys)
        .with_context(|| format!("Invalid key script {:?}", args.keys))?;

    let mut buffer = EditableTextBuffer::from_text(&content).with_special_mode(args.show_special);
    let mut clipboard = None;
    let mut consumed = 0;
    for event in &events {
        if dispatch_key(&mut buffer, &mut clipboard, *event) {
            consumed += 1;
        }
    }
    tracing::info!(
        "Replayed {} key(s), {} consumed, {} undo entries",
        events.len(),
        consumed,
        buffer.undo_count()
    );

    if let Some(output) = &args.output {
        doc_io::write_document(output, &buffer.text())?;
    }
    println!("{}", buffer.display_text());
    Ok(())
}

fn run_session(args: SessionArgs) -> Result<()> {
    let autosave_dir = config_paths::ensure_autosave_dir().map_err(|e| anyhow!(e))?;
    let mut session = Session::restore(
        Settings::load(),
        autosave_dir,
        config_paths::settings_file(),
    )?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    print_status(&mut stdout, &session, args.lines)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if let Err(e) = apply_line(&mut session, &line) {
            writeln!(stdout, "error: {:#}", e)?;
        }
        session.tick(Instant::now());
        print_status(&mut stdout, &session, args.lines)?;
    }

    session.on_closing();
    Ok(())
}

/// `:command [arg]` lines drive the session; anything else is a key script
fn apply_line(session: &mut Session, line: &str) -> Result<()> {
    let Some(command) = line.strip_prefix(':') else {
        for event in KeyEvent::parse_script(line)? {
            session.handle_key(event);
        }
        return Ok(());
    };

    let (name, arg) = command
        .split_once(' ')
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));
    match name {
        "new" => {
            session.new_tab(None);
        }
        "open" => {
            session.open_file(Path::new(arg))?;
        }
        "save" => session.save_active()?,
        "save-as" => session.save_active_as(Path::new(arg))?,
        "close" => {
            let id = session.active().id;
            if !session.close_tab(id, parse_close_choice(arg))? {
                return Err(anyhow!(
                    "{} is untitled: use :close discard or :close PATH",
                    session.active().title
                ));
            }
        }
        "special" => session.set_show_special(arg != "off"),
        "font" => {
            let size = arg
                .parse()
                .with_context(|| format!("Invalid font size {:?}", arg))?;
            session.set_font_size(size);
        }
        other => return Err(anyhow!("Unknown command :{}", other)),
    }
    Ok(())
}

fn print_status(out: &mut impl Write, session: &Session, chars_per_line: usize) -> Result<()> {
    let tab = session.active();
    writeln!(
        out,
        "[{}] {} lines: {}",
        tab.title,
        tab.buffer.caret(),
        session.visual_line_count(chars_per_line)
    )?;
    writeln!(out, "{}", tab.buffer.display_text())?;
    Ok(())
}
