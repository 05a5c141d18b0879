//! Tab session
//!
//! Owns the open tabs, the clipboard register and the settings. The host
//! forwards key events to [`Session::handle_key`] and calls [`Session::tick`]
//! from its event loop so untitled documents are autosaved every 30 seconds.
//!
//! Untitled tabs live as `Untitled<N>.txt` files in the autosave directory
//! and are reopened by [`Session::restore`] on the next start.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::editable::{EditableTextBuffer, Key, KeyEvent};
use crate::io::{filename_for_display, read_document, write_document};
use crate::layout;
use crate::settings::{Settings, TabRecord};

/// Interval between autosaves
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

const UNTITLED_PREFIX: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

/// One open document
#[derive(Debug)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    /// Backing file; untitled tabs point into the autosave directory
    pub path: PathBuf,
    pub buffer: EditableTextBuffer,
}

/// Answer to "save before closing?" for an untitled tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseChoice {
    /// Keep the tab open
    Cancel,
    /// Save to this path, then close
    SaveAs(PathBuf),
    /// Close and delete the autosave file
    Discard,
}

#[derive(Debug)]
pub struct Session {
    tabs: Vec<Tab>,
    active: usize,
    next_id: u64,
    settings: Settings,
    /// Where settings are persisted; `None` keeps them in memory only
    settings_path: Option<PathBuf>,
    autosave_dir: PathBuf,
    clipboard: Option<String>,
    last_autosave: Option<Instant>,
}

impl Session {
    /// Session with a single empty untitled tab
    pub fn new(settings: Settings, autosave_dir: impl Into<PathBuf>) -> Self {
        let mut session = Self::empty(settings, autosave_dir.into());
        session.new_tab(None);
        session
    }

    /// Persist settings to `path` whenever they change
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Reopen autosaved untitled documents and the files recorded in
    /// `settings.open_tabs`. Opens one empty tab when nothing was restored.
    pub fn restore(
        settings: Settings,
        autosave_dir: impl Into<PathBuf>,
        settings_path: Option<PathBuf>,
    ) -> Result<Self> {
        let autosave_dir = autosave_dir.into();
        fs::create_dir_all(&autosave_dir).with_context(|| {
            format!("Failed to create autosave dir {}", autosave_dir.display())
        })?;

        let mut session = Self::empty(settings, autosave_dir);
        session.settings_path = settings_path;

        let mut autosaved: Vec<PathBuf> = fs::read_dir(&session.autosave_dir)
            .with_context(|| format!("Failed to list {}", session.autosave_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        autosaved.sort();

        let highest = autosaved
            .iter()
            .filter_map(|path| untitled_number(path))
            .max()
            .unwrap_or(0);
        session.settings.untitled_counter = highest.saturating_add(1);

        for path in &autosaved {
            if let Err(e) = session.open_file(path) {
                tracing::warn!("Skipping autosave file {}: {:#}", path.display(), e);
            }
        }

        for record in std::mem::take(&mut session.settings.open_tabs) {
            match session.open_file(&record.path) {
                Ok(id) => {
                    if let Some(tab) = session.tab_mut(id) {
                        tab.buffer.set_caret(record.caret);
                    }
                }
                Err(e) => tracing::warn!("Could not reopen {}: {:#}", record.path.display(), e),
            }
        }

        if session.tabs.is_empty() {
            session.new_tab(None);
        }
        session.active = 0;
        session.record_open_tabs();

        tracing::info!(
            "Restored session with {} tab(s), next untitled {}",
            session.tabs.len(),
            session.settings.untitled_counter
        );
        Ok(session)
    }

    fn empty(settings: Settings, autosave_dir: PathBuf) -> Self {
        Self {
            tabs: Vec::new(),
            active: 0,
            next_id: 1,
            settings,
            settings_path: None,
            autosave_dir,
            clipboard: None,
            last_autosave: None,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active]
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn autosave_dir(&self) -> &Path {
        &self.autosave_dir
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// True when the tab's file is an autosave file
    pub fn is_untitled(&self, id: TabId) -> bool {
        self.tab(id)
            .is_some_and(|tab| tab.path.starts_with(&self.autosave_dir))
    }

    /// Wrapped line count of the active tab's displayed text
    pub fn visual_line_count(&self, chars_per_line: usize) -> usize {
        layout::visual_line_count(&self.active().buffer.display_text(), chars_per_line)
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    pub fn activate(&mut self, id: TabId) -> bool {
        match self.tabs.iter().position(|tab| tab.id == id) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Open an untitled tab backed by `<autosave_dir>/Untitled<N>.txt`
    pub fn new_tab(&mut self, content: Option<&str>) -> TabId {
        let number = self.settings.untitled_counter.max(1);
        self.settings.untitled_counter = number.saturating_add(1);
        let title = format!("{}{}", UNTITLED_PREFIX, number);
        let path = self.autosave_dir.join(format!("{}.txt", title));

        let id = self.push_tab(title, path, content.unwrap_or_default());
        tracing::info!("New tab {}", self.active().title);
        self.persist_settings();
        id
    }

    /// Open `path`, or activate the tab that already shows it
    pub fn open_file(&mut self, path: &Path) -> Result<TabId> {
        if let Some(tab) = self.tabs.iter().find(|tab| tab.path == path) {
            let id = tab.id;
            self.activate(id);
            return Ok(id);
        }

        let content = read_document(path)?;
        let title = tab_title(path);
        Ok(self.push_tab(title, path.to_path_buf(), &content))
    }

    fn push_tab(&mut self, title: String, path: PathBuf, content: &str) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        let buffer =
            EditableTextBuffer::from_text(content).with_special_mode(self.settings.show_special);
        self.tabs.push(Tab {
            id,
            title,
            path,
            buffer,
        });
        self.active = self.tabs.len() - 1;
        id
    }

    /// Write the active tab to its file
    pub fn save_active(&mut self) -> Result<()> {
        let tab = self.active();
        write_document(&tab.path, &tab.buffer.text())
    }

    /// Write the active tab to `path` and retarget the tab there
    pub fn save_active_as(&mut self, path: &Path) -> Result<()> {
        self.save_tab_as(self.active, path)
    }

    fn save_tab_as(&mut self, index: usize, path: &Path) -> Result<()> {
        let old_path = self.tabs[index].path.clone();
        write_document(path, &self.tabs[index].buffer.text())?;

        if old_path != path && old_path.starts_with(&self.autosave_dir) {
            if let Err(e) = fs::remove_file(&old_path) {
                tracing::warn!("Could not remove autosave {}: {}", old_path.display(), e);
            }
        }

        let tab = &mut self.tabs[index];
        tab.path = path.to_path_buf();
        tab.title = tab_title(path);
        tracing::info!("Saved {} as {}", old_path.display(), path.display());
        Ok(())
    }

    /// Close a tab. Untitled tabs honour `choice`; named tabs close directly.
    /// Returns false when the tab stays open.
    pub fn close_tab(&mut self, id: TabId, choice: CloseChoice) -> Result<bool> {
        let Some(index) = self.tabs.iter().position(|tab| tab.id == id) else {
            return Ok(false);
        };

        if self.is_untitled(id) {
            match choice {
                CloseChoice::Cancel => return Ok(false),
                CloseChoice::SaveAs(path) => self.save_tab_as(index, &path)?,
                CloseChoice::Discard => {
                    let path = &self.tabs[index].path;
                    match fs::remove_file(path) {
                        Ok(()) => tracing::debug!("Discarded {}", path.display()),
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                        Err(e) => {
                            tracing::warn!("Could not remove {}: {}", path.display(), e)
                        }
                    }
                }
            }
        }

        let tab = self.tabs.remove(index);
        tracing::info!("Closed tab {}", tab.title);

        if self.tabs.is_empty() {
            self.new_tab(None);
        } else {
            self.active = self.tabs.len() - 1;
        }
        Ok(true)
    }

    // =========================================================================
    // Autosave
    // =========================================================================

    /// Write every tab to its file. Returns the number written.
    pub fn autosave_all(&mut self) -> usize {
        let mut saved = 0;
        for tab in &self.tabs {
            match write_document(&tab.path, &tab.buffer.text()) {
                Ok(()) => saved += 1,
                Err(e) => tracing::warn!("Autosave of {} failed: {:#}", tab.title, e),
            }
        }
        self.record_open_tabs();
        self.persist_settings();
        tracing::debug!("Autosaved {}/{} tab(s)", saved, self.tabs.len());
        saved
    }

    /// Autosave if the interval has elapsed since the last one.
    /// Returns true when an autosave ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self
            .last_autosave
            .map_or(true, |last| now.saturating_duration_since(last) >= AUTOSAVE_INTERVAL);
        if due {
            self.autosave_all();
            self.last_autosave = Some(now);
        }
        due
    }

    /// Final autosave before the host exits
    pub fn on_closing(&mut self) {
        self.autosave_all();
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Route a key event to the active tab. Returns true when consumed.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let buffer = &mut self.tabs[self.active].buffer;
        dispatch_key(buffer, &mut self.clipboard, event)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Apply a font size (clamped to 10..=80) and persist it
    pub fn set_font_size(&mut self, size: u32) -> u32 {
        let applied = self.settings.set_font_size(size);
        tracing::debug!("Font size {}", applied);
        self.persist_settings();
        applied
    }

    /// Switch every open buffer between plain and glyph display
    pub fn set_show_special(&mut self, show: bool) {
        self.settings.show_special = show;
        for tab in &mut self.tabs {
            tab.buffer.toggle_special_mode(show);
        }
        self.persist_settings();
    }

    fn record_open_tabs(&mut self) {
        self.settings.open_tabs = self
            .tabs
            .iter()
            .filter(|tab| !tab.path.starts_with(&self.autosave_dir))
            .map(|tab| TabRecord {
                path: tab.path.clone(),
                caret: tab.buffer.caret(),
            })
            .collect();
    }

    fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            tracing::warn!("{}", e);
        }
    }
}

/// Apply one key event to `buffer`: editor shortcuts first (undo, redo,
/// clipboard, select all), then the buffer's own key handling, then caret
/// movement. `clipboard` is the register used by cut, copy and paste.
pub fn dispatch_key(
    buffer: &mut EditableTextBuffer,
    clipboard: &mut Option<String>,
    event: KeyEvent,
) -> bool {
    if handle_shortcut(buffer, clipboard, event) {
        return true;
    }
    buffer.handle_key_press(event) || buffer.handle_navigation(event)
}

fn handle_shortcut(
    buffer: &mut EditableTextBuffer,
    clipboard: &mut Option<String>,
    event: KeyEvent,
) -> bool {
    let modifiers = event.modifiers;
    if !(modifiers.ctrl() || modifiers.meta()) || modifiers.alt() {
        return false;
    }
    let Key::Char(ch) = event.key else {
        return false;
    };

    match ch.to_ascii_lowercase() {
        'z' if modifiers.shift() => {
            buffer.redo();
        }
        'z' => {
            buffer.undo();
        }
        'y' => {
            buffer.redo();
        }
        'x' => {
            if let Some(text) = buffer.cut() {
                *clipboard = Some(text);
            }
        }
        'c' => {
            if let Some(text) = buffer.copy() {
                *clipboard = Some(text);
            }
        }
        'v' => {
            if let Some(text) = clipboard.as_deref() {
                buffer.paste(text);
            }
        }
        'a' => buffer.select_all(),
        _ => return false,
    }
    true
}

/// File stem for tab titles, falling back to the full file name
fn tab_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| filename_for_display(path))
}

/// `N` from an `Untitled<N>.txt` path
fn untitled_number(path: &Path) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(UNTITLED_PREFIX)?
        .parse()
        .ok()
}
