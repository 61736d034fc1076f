//! # File Uploads
//!
//! Reads a user-chosen file into a [`PendingFile`] the session can submit as
//! document context. Only text-like files are accepted; content must decode
//! as UTF-8.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};

/// Extensions (lowercase, without the dot) accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "json", "log", "yaml", "yml", "toml", "xml", "html", "py",
    "rs", "js", "ts",
];

/// Largest file accepted for upload.
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

const FILE_PROMPT_PREFIX: &str = "Please analyze this file: ";

/// A file that has been read from disk and is staged for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub content: String,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The user-visible message recorded when this file is submitted.
    pub fn upload_notice(&self) -> String {
        format!("Uploaded file: {}", self.name)
    }

    /// The prompt sent to the backend alongside the file content.
    pub fn prompt(&self) -> String {
        format!("{FILE_PROMPT_PREFIX}{}", self.name)
    }
}

/// Extract the file name from a prompt built by [`PendingFile::prompt`].
pub fn file_name_from_prompt(prompt: &str) -> Option<&str> {
    prompt.strip_prefix(FILE_PROMPT_PREFIX)
}

#[derive(Debug)]
pub enum UploadError {
    Io(io::Error),
    /// Extension not in [`ALLOWED_EXTENSIONS`] (carries the file name).
    UnsupportedType(String),
    TooLarge { size: u64, limit: u64 },
    /// Content is not valid UTF-8.
    NotText,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Io(e) => write!(f, "could not read file: {e}"),
            UploadError::UnsupportedType(name) => {
                write!(f, "unsupported file type: {name} (text files only)")
            }
            UploadError::TooLarge { size, limit } => {
                write!(f, "file too large: {size} bytes (limit {limit})")
            }
            UploadError::NotText => write!(f, "file is not valid UTF-8 text"),
        }
    }
}

impl std::error::Error for UploadError {}

/// Whether a path has an accepted extension (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Read a file from disk into a [`PendingFile`].
pub fn read_upload(path: &Path) -> Result<PendingFile, UploadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if !is_supported(path) {
        debug!("Rejected upload with unsupported extension: {}", path.display());
        return Err(UploadError::UnsupportedType(name));
    }

    let size = fs::metadata(path).map_err(UploadError::Io)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let bytes = fs::read(path).map_err(UploadError::Io)?;
    let content = String::from_utf8(bytes).map_err(|_| UploadError::NotText)?;

    info!("Read upload {} ({} bytes)", name, content.len());
    Ok(PendingFile::new(name, content))
}
