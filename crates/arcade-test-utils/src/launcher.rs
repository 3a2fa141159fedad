//! [`RecordingLauncher`]: records launches instead of spawning processes.

use arcade_launch::{LaunchError, LaunchReceipt, Launcher, ResolvedLaunch};
use parking_lot::Mutex;

/// Launcher that remembers every request and optionally fails them all.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launches: Mutex<Vec<ResolvedLaunch>>,
    failure: Option<LaunchError>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose every launch fails with `error` (after recording it).
    pub fn failing(error: LaunchError) -> Self {
        Self {
            launches: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    /// Launches requested so far
    pub fn launches(&self) -> Vec<ResolvedLaunch> {
        self.launches.lock().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, launch: &ResolvedLaunch) -> Result<LaunchReceipt, LaunchError> {
        self.launches.lock().push(launch.clone());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(LaunchReceipt { pid: None }),
        }
    }
}
