//! Process launching
//!
//! Launches are fire-and-forget: the child gets null stdio and is reaped on
//! a detached thread so it never lingers as a zombie. Only failure to start
//! is reported.

use std::io;
use std::process::{Child, Command, Stdio};

use tracing::{info, warn};

use crate::error::{LaunchError, Result};
use crate::types::{LaunchReceipt, ResolvedLaunch};

/// Starts resolved launches.
pub trait Launcher: Send + Sync {
    fn launch(&self, launch: &ResolvedLaunch) -> Result<LaunchReceipt>;
}

/// Spawns the resolved command as a detached child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, launch: &ResolvedLaunch) -> Result<LaunchReceipt> {
        let (program, args) = launch.argv.split_first().ok_or_else(|| LaunchError::Malformed {
            message: "empty command".to_string(),
        })?;
        if program.is_empty() {
            return Err(LaunchError::Malformed {
                message: "empty program name".to_string(),
            });
        }

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| classify(program, e))?;

        let pid = child.id();
        info!(pid, label = %launch.label, command = %launch.command, "launched");
        reap(child);

        Ok(LaunchReceipt { pid: Some(pid) })
    }
}

fn classify(program: &str, error: io::Error) -> LaunchError {
    let program = program.to_string();
    match error.kind() {
        io::ErrorKind::NotFound => LaunchError::NotFound { program },
        io::ErrorKind::PermissionDenied => LaunchError::PermissionDenied { program },
        io::ErrorKind::InvalidInput => LaunchError::Malformed {
            message: error.to_string(),
        },
        _ => LaunchError::Io {
            program,
            message: error.to_string(),
        },
    }
}

fn reap(mut child: Child) {
    let spawned = std::thread::Builder::new()
        .name("arcade-reaper".to_string())
        .spawn(move || {
            let _ = child.wait();
        });
    if let Err(e) = spawned {
        // The child keeps running; it is only left unreaped.
        warn!(error = %e, "could not start reaper thread");
    }
}
