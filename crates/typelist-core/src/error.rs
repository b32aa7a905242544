//! Error types for listing operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a content classifier.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The file could not be opened or read.
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path is not a regular file.
    #[error("not a regular file: \"{path}\"")]
    Unsupported { path: PathBuf },
}

impl ClassifyError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Fatal errors that end a listing run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A root path could not be opened at all.
    #[error("\"{path}\": {source}")]
    InaccessibleRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content classification failed.
    #[error("Classification failed: {0}")]
    Classification(#[from] ClassifyError),

    /// The walk finished without recording a single entry.
    #[error("Nothing to list")]
    NothingToList,

    /// Writing the listing failed.
    #[error("Failed to write output: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an inaccessible-root error.
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InaccessibleRoot {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(source: std::io::Error) -> Self {
        Self::Output { source }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// A root path was skipped because it could not be opened.
    InaccessibleRoot,
}

/// Non-fatal warning encountered during a walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot read {}: {error}", path.display()),
            path,
            kind: WarningKind::ReadError,
        }
    }

    /// Create a metadata error warning.
    pub fn metadata_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot stat {}: {error}", path.display()),
            path,
            kind: WarningKind::MetadataError,
        }
    }

    /// Create a warning for a skipped root.
    pub fn inaccessible_root(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("\"{}\": {error}", path.display()),
            path,
            kind: WarningKind::InaccessibleRoot,
        }
    }

    /// Pick the warning matching an I/O failure on a walked node.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::read_error(path, error),
        }
    }
}
