//! Error types for arcade-fs

use std::path::PathBuf;

/// Result type for arcade-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in arcade-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to snapshot a whole root.
///
/// Failures below the root (an unreadable subdirectory, a dangling link) are
/// not scan errors; they are recorded on the snapshot as skipped entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The root does not exist or is not a directory
    #[error("Scan root {root} is missing or not a directory")]
    RootMissing { root: PathBuf },

    /// The root exists but could not be listed
    #[error("Scan root {root} is unreadable: {message}")]
    RootUnreadable { root: PathBuf, message: String },
}

impl ScanError {
    /// The root this error refers to
    pub fn root(&self) -> &std::path::Path {
        match self {
            Self::RootMissing { root } | Self::RootUnreadable { root, .. } => root,
        }
    }
}
