//! Centralized configuration paths for natatnik
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/natatnik/`
//! - Windows: `%APPDATA%\natatnik\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "natatnik";

/// Base config directory for natatnik
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/natatnik`
///   - Else: `~/.config/natatnik`
///
/// Windows:
///   - `%APPDATA%\natatnik`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/natatnik/settings.json`
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

/// `~/.config/natatnik/autosave/`
pub fn autosave_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("autosave"))
}

/// `~/.config/natatnik/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure autosave dir exists, returning it
pub fn ensure_autosave_dir() -> Result<PathBuf, String> {
    let autosave = ensure_config_dir()?.join("autosave");
    ensure_dir(&autosave)?;
    Ok(autosave)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
