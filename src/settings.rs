//! Settings persistence
//!
//! Stores user preferences and the open-tab list in
//! `~/.config/natatnik/settings.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editable::Position;

pub const DEFAULT_FONT_SIZE: u32 = 28;
pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 80;

/// A tab that was open when settings were last saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub path: PathBuf,
    #[serde(default)]
    pub caret: Position,
}

/// Settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Next number used for an `Untitled<N>` tab
    #[serde(default = "default_untitled_counter")]
    pub untitled_counter: u32,

    /// Show whitespace as glyphs
    #[serde(default)]
    pub show_special: bool,

    #[serde(default)]
    pub open_tabs: Vec<TabRecord>,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_untitled_counter() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            untitled_counter: default_untitled_counter(),
            show_special: false,
            open_tabs: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the config dir, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::settings_file() else {
            tracing::debug!("No config directory available, using default settings");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Settings>(&content) {
                Ok(mut settings) => {
                    settings.font_size = clamp_font_size(settings.font_size);
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::settings_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save settings to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write settings to {}: {}", path.display(), e))?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Set the font size, clamped to the slider range. Returns the applied size.
    pub fn set_font_size(&mut self, size: u32) -> u32 {
        self.font_size = clamp_font_size(size);
        self.font_size
    }
}

pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}
