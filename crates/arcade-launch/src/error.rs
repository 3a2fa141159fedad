//! Error types for launch operations

use std::path::PathBuf;

/// Why no launch could be resolved for a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
    /// No rule exists for the file's extension
    #[error("no launch rule for .{extension} files")]
    NoRule { extension: String },

    /// A rule exists but none of its launchers is available
    #[error("no viable launcher for {}", path.display())]
    NoViableLauncher { path: PathBuf },
}

/// Failure to start a program.
///
/// Only start-time failures exist; what happens after a successful start is
/// not observed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    /// The program does not exist
    #[error("program not found: {program}")]
    NotFound { program: String },

    /// The program exists but may not be executed
    #[error("permission denied starting {program}")]
    PermissionDenied { program: String },

    /// The invocation could not be turned into a command
    #[error("malformed invocation: {message}")]
    Malformed { message: String },

    /// Any other operating-system failure at start
    #[error("failed to start {program}: {message}")]
    Io { program: String, message: String },
}

/// Result type alias for launch operations
pub type Result<T> = std::result::Result<T, LaunchError>;
