//! Shared types for launch operations

use std::path::PathBuf;

use serde::Serialize;

/// Which resolution step produced a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchKind {
    /// The rule's primary program
    Primary,
    /// A secondary runner with the rule's artifact
    SecondaryRunner,
    /// The file itself
    SelfExecuting,
}

/// A concrete invocation for one file. Produced per request, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLaunch {
    /// Display form of the command line
    pub command: String,
    /// Display label, e.g. "Snes9x" or "RetroArch (snes9x_libretro)"
    pub label: String,
    pub kind: LaunchKind,
    /// Program followed by its arguments
    pub argv: Vec<String>,
    /// The media file being launched
    pub file: PathBuf,
}

impl ResolvedLaunch {
    pub fn new(label: String, kind: LaunchKind, argv: Vec<String>, file: PathBuf) -> Self {
        Self {
            command: display_command(&argv),
            label,
            kind,
            argv,
            file,
        }
    }

    /// The program that will be started
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

/// What a successful start reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchReceipt {
    /// Operating-system process id, when the launcher spawned a process
    pub pid: Option<u32>,
}

/// Render an argument vector as a command line, quoting arguments that
/// contain whitespace or quotes or are empty.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
