//! Error types for arcade-rules

use crate::template::{Placeholder, TemplateError};

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to load a rules file as a whole.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] arcade_fs::Error),
}

/// A structurally invalid rule or runner entry.
///
/// The entry is excluded from the table; loading continues with the rest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{entry}: malformed entry: {message}")]
    Malformed { entry: String, message: String },

    #[error("{entry}: missing required field `{field}`")]
    MissingField { entry: String, field: &'static str },

    #[error("{entry}: invalid extension {extension:?}")]
    InvalidExtension { entry: String, extension: String },

    #[error("{entry}: invalid template: {source}")]
    InvalidTemplate {
        entry: String,
        #[source]
        source: TemplateError,
    },

    #[error("{entry}: template must use {placeholder}")]
    MissingPlaceholder {
        entry: String,
        placeholder: Placeholder,
    },

    #[error("{entry}: {placeholder} is not available in this template")]
    MisplacedPlaceholder {
        entry: String,
        placeholder: Placeholder,
    },

    #[error("{entry}: declares no way to launch (needs a program, a runner or self_executing)")]
    NoLauncher { entry: String },

    #[error("{entry}: unknown secondary runner `{runner}`")]
    UnknownRunner { entry: String, runner: String },
}

impl ConfigError {
    /// Label of the offending entry, e.g. `rules[2] (.nes)`
    pub fn entry(&self) -> &str {
        match self {
            Self::Malformed { entry, .. }
            | Self::MissingField { entry, .. }
            | Self::InvalidExtension { entry, .. }
            | Self::InvalidTemplate { entry, .. }
            | Self::MissingPlaceholder { entry, .. }
            | Self::MisplacedPlaceholder { entry, .. }
            | Self::NoLauncher { entry }
            | Self::UnknownRunner { entry, .. } => entry,
        }
    }
}
