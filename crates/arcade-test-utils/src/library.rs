//! [`TestLibrary`] builder for catalog test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use arcade_rules::{DLL_SUFFIX, EXE_SUFFIX};
use tempfile::TempDir;

/// A temporary project root laid out the way `EngineConfig::for_root`
/// expects: `Games/`, `Emulators/` and `Cores/`, plus a `volumes/`
/// directory whose children stand in for removable media.
///
/// # Example
///
/// ```rust,no_run
/// use arcade_test_utils::TestLibrary;
///
/// let lib = TestLibrary::new();
/// lib.add_game("a.nes");
/// lib.install_program("fceux");
/// let usb = lib.add_volume("usb");
/// lib.add_volume_game(&usb, "b.smc");
/// ```
pub struct TestLibrary {
    temp_dir: TempDir,
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLibrary {
    /// Create the directory layout.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["Games", "Emulators", "Cores", "volumes"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn games_dir(&self) -> PathBuf {
        self.root().join("Games")
    }

    pub fn programs_dir(&self) -> PathBuf {
        self.root().join("Emulators")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root().join("Cores")
    }

    /// Write a file below the library root and return its path.
    pub fn add_game(&self, relative: &str) -> PathBuf {
        write_file(&self.games_dir().join(relative), b"rom")
    }

    /// Remove a file below the library root.
    pub fn remove_game(&self, relative: &str) {
        fs::remove_file(self.games_dir().join(relative)).unwrap();
    }

    /// Create a directory standing in for a mounted volume.
    pub fn add_volume(&self, name: &str) -> PathBuf {
        let path = self.root().join("volumes").join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write a file below a volume created with [`add_volume`](Self::add_volume).
    pub fn add_volume_game(&self, volume: &Path, relative: &str) -> PathBuf {
        write_file(&volume.join(relative), b"rom")
    }

    /// Install a primary program or runner, adding the platform executable
    /// suffix. On Unix the file is an executable shell script that exits 0.
    pub fn install_program(&self, stem: &str) -> PathBuf {
        let path = self.programs_dir().join(format!("{stem}{EXE_SUFFIX}"));
        write_file(&path, b"#!/bin/sh\nexit 0\n");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    /// Install a runner artifact, adding the platform library suffix.
    pub fn install_artifact(&self, stem: &str) -> PathBuf {
        write_file(
            &self.artifacts_dir().join(format!("{stem}{DLL_SUFFIX}")),
            b"core",
        )
    }

    /// Move a file's modification time `secs` seconds into the future.
    pub fn touch(&self, path: &Path, secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))
            .unwrap();
    }
}

fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}
