//! Error types for arcade-core

use std::path::PathBuf;

/// Result type for arcade-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in arcade-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loaded but holds unusable values
    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// `start` called on a running service
    #[error("Catalog service is already running")]
    AlreadyStarted,

    /// `start` called after `stop`
    #[error("Catalog service has been stopped")]
    Stopped,

    /// A refresh cycle panicked; the previous snapshot stays published
    #[error("Refresh cycle panicked: {message}")]
    CyclePanicked { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from arcade-fs
    #[error(transparent)]
    Fs(#[from] arcade_fs::Error),

    /// Rules error from arcade-rules
    #[error(transparent)]
    Rules(#[from] arcade_rules::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
