//! Validated launch rule

use serde::Serialize;

use crate::template::Template;

/// How files with one extension are launched. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEntry {
    /// Lowercase extension without the leading dot
    pub extension: String,
    /// System the files belong to (e.g. "Super Nintendo")
    pub system: String,
    /// Primary program, relative to the programs directory
    pub program: Option<String>,
    /// Display label of the primary program (e.g. "Snes9x")
    pub label: String,
    /// Invocation using `{program}` and `{file}`
    pub template: Template,
    /// Secondary runner fallback
    pub runner: Option<RunnerLink>,
    /// The file is itself the program
    pub self_executing: bool,
    /// Informational: platforms the primary program is known to run on
    pub platforms: Vec<String>,
    /// Informational notes for the front end
    pub notes: Option<String>,
}

/// A rule's reference to a secondary runner and the artifact it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerLink {
    /// Id of a [`crate::SecondaryRunner`]
    pub runner: String,
    /// Artifact (plugin/core) file, relative to the artifacts directory
    pub artifact: String,
}

impl RuleEntry {
    /// Display extension with its leading dot
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.extension)
    }
}
