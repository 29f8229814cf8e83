//! Error types for txtepub operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a text file or writing an EPUB.
///
/// Structure recovery itself never fails; these cover the file system
/// (archive write failures arrive here as I/O errors), user-supplied
/// configuration and JSON output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[cfg(feature = "cli")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
