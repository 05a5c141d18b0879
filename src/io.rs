//! Document file I/O
//!
//! Files are UTF-8. Saving writes the literal text plus one trailing newline;
//! loading strips one trailing newline, so a load/save cycle leaves the file
//! unchanged.
//!
//! Files are validated before opening:
//! - existence and permissions
//! - size limit
//! - binary content

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Errors that can occur when validating a file for opening
#[derive(Debug, Clone, PartialEq)]
pub enum FileOpenError {
    NotFound,
    PermissionDenied,
    IsDirectory,
    /// Contains null bytes in its first 8 KB
    BinaryFile,
    TooLarge { size_mb: f64 },
    IoError(String),
}

impl FileOpenError {
    /// Message suitable for an error dialog
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot open directory: {}", filename),
            Self::BinaryFile => format!("Cannot open binary file: {}", filename),
            Self::TooLarge { size_mb } => format!(
                "{} is too large ({:.1} MB, max {} MB)",
                filename,
                size_mb,
                MAX_FILE_SIZE / (1024 * 1024)
            ),
            Self::IoError(msg) => format!("Error opening {}: {}", filename, msg),
        }
    }
}

impl std::fmt::Display for FileOpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::BinaryFile => write!(f, "binary file"),
            Self::TooLarge { size_mb } => write!(f, "file too large ({:.1} MB)", size_mb),
            Self::IoError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FileOpenError {}

/// Check that `path` is a readable regular file within the size limit and
/// does not look binary
pub fn validate_file_for_opening(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileOpenError::NotFound,
        std::io::ErrorKind::PermissionDenied => FileOpenError::PermissionDenied,
        _ => FileOpenError::IoError(e.to_string()),
    })?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    if is_likely_binary(path) {
        return Err(FileOpenError::BinaryFile);
    }

    Ok(())
}

/// Scan the first 8 KB for null bytes.
///
/// Returns `false` on any read error so the actual open reports it.
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; 8192];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}

/// File name for tab titles and error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Validate and read a document with `\n` line endings, stripping one
/// trailing newline
pub fn read_document(path: &Path) -> Result<String> {
    validate_file_for_opening(path)
        .map_err(|e| anyhow::anyhow!(e.user_message(&filename_for_display(path))))?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    tracing::info!("Read {} ({} bytes)", path.display(), content.len());
    Ok(strip_trailing_newline(normalize_line_endings(content)))
}

/// Write literal document text followed by one newline
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut content = String::with_capacity(text.len() + 1);
    content.push_str(text);
    content.push('\n');

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} ({} chars)", path.display(), text.chars().count());
    Ok(())
}

/// `\r\n` and bare `\r` become `\n`; the buffer only knows `\n` line breaks
pub fn normalize_line_endings(content: String) -> String {
    if content.contains('\r') {
        content.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        content
    }
}

fn strip_trailing_newline(mut content: String) -> String {
    if content.ends_with('\n') {
        content.truncate(content.len() - 1);
    }
    content
}
