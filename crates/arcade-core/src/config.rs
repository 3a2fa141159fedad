//! Engine configuration
//!
//! # Example TOML
//!
//! ```toml
//! library_root = "Games"
//! programs_dir = "Emulators"
//! artifacts_dir = "Cores"
//! rules_file = "rules.toml"
//! scan_interval_secs = 30
//! stop_timeout_secs = 5
//!
//! [volumes]
//! min_capacity_mb = 100
//! mount_prefixes = ["/media", "/mnt", "/Volumes", "/run/media"]
//!
//! [catalog]
//! metadata_suffixes = ["_metadata.json", ".json"]
//! ```
//!
//! Relative paths resolve against the directory of the file they were read
//! from (or the project root for [`EngineConfig::for_root`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use arcade_catalog::DEFAULT_METADATA_SUFFIXES;
use arcade_fs::{ConfigStore, VolumeWatcherConfig};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the per-project configuration file
pub const CONFIG_FILE: &str = "arcade.toml";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Everything the catalog service needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed local library scanned every cycle
    pub library_root: PathBuf,
    /// Directory holding primary programs and secondary runners
    pub programs_dir: PathBuf,
    /// Directory holding runner artifacts
    pub artifacts_dir: PathBuf,
    /// Optional rules file merged over the built-in rules
    pub rules_file: Option<PathBuf>,
    /// Seconds between refresh cycles
    pub scan_interval_secs: u64,
    /// Seconds `stop` waits for the worker
    pub stop_timeout_secs: u64,
    pub volumes: VolumeSettings,
    pub catalog: CatalogSettings,
}

/// Removable volume detection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    /// Volumes smaller than this are ignored
    pub min_capacity_mb: u64,
    /// Mount points below these prefixes count as removable
    pub mount_prefixes: Vec<String>,
}

/// Cataloging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// File name suffixes that are metadata, never media
    pub metadata_suffixes: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from("Games"),
            programs_dir: PathBuf::from("Emulators"),
            artifacts_dir: PathBuf::from("Cores"),
            rules_file: Some(PathBuf::from("rules.toml")),
            scan_interval_secs: 30,
            stop_timeout_secs: 5,
            volumes: VolumeSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl Default for VolumeSettings {
    fn default() -> Self {
        let defaults = VolumeWatcherConfig::default();
        Self {
            min_capacity_mb: defaults.min_capacity_bytes / BYTES_PER_MB,
            mount_prefixes: defaults.mount_prefixes,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            metadata_suffixes: DEFAULT_METADATA_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration file (TOML, JSON or YAML).
    ///
    /// Relative paths inside resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = config.resolved_against(base);
        config.validate(path)?;
        Ok(config)
    }

    /// Configuration for a project root.
    ///
    /// Uses `root/arcade.toml` when present, the default layout
    /// (`Games/`, `Emulators/`, `Cores/`) otherwise.
    pub fn for_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading project config");
            Self::load(&path)
        } else {
            tracing::debug!(root = %root.display(), "no project config, using defaults");
            Ok(Self::default().resolved_against(root))
        }
    }

    /// Per-user configuration location.
    ///
    /// - Linux: `~/.config/arcade/arcade.toml`
    /// - macOS: `~/Library/Application Support/arcade/arcade.toml`
    /// - Windows: `%APPDATA%\arcade\arcade.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("arcade").join(CONFIG_FILE))
    }

    /// Make every relative path absolute against `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.library_root);
        resolve(&mut self.programs_dir);
        resolve(&mut self.artifacts_dir);
        if let Some(rules_file) = self.rules_file.as_mut() {
            resolve(rules_file);
        }
        self
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.scan_interval_secs == 0 {
            return Err(Error::InvalidConfig {
                path: path.to_path_buf(),
                message: "scan_interval_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    /// Settings for the volume watcher
    pub fn volume_watcher_config(&self) -> VolumeWatcherConfig {
        VolumeWatcherConfig {
            min_capacity_bytes: self.volumes.min_capacity_mb.saturating_mul(BYTES_PER_MB),
            mount_prefixes: self.volumes.mount_prefixes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.scan_interval(), Duration::from_secs(30));
        assert_eq!(config.volume_watcher_config().min_capacity_bytes, 100 * 1024 * 1024);
        assert_eq!(config.catalog.metadata_suffixes, vec!["_metadata.json", ".json"]);
    }

    #[test]
    fn test_for_root_without_file() {
        let temp = TempDir::new().unwrap();
        let config = EngineConfig::for_root(temp.path()).unwrap();
        assert_eq!(config.library_root, temp.path().join("Games"));
        assert_eq!(config.rules_file, Some(temp.path().join("rules.toml")));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "library_root = \"/srv/roms\"\nscan_interval_secs = 10\n\n[volumes]\nmin_capacity_mb = 1\n",
        )
        .unwrap();

        let config = EngineConfig::for_root(temp.path()).unwrap();
        assert_eq!(config.library_root, PathBuf::from("/srv/roms"));
        assert_eq!(config.programs_dir, temp.path().join("Emulators"));
        assert_eq!(config.scan_interval_secs, 10);
        assert_eq!(config.volumes.min_capacity_mb, 1);
        assert_eq!(config.volumes.mount_prefixes, VolumeSettings::default().mount_prefixes);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("arcade.toml");
        fs::write(&path, "scan_interval_secs = 0\n").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_yaml_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("arcade.yaml");
        fs::write(&path, "programs_dir: emus\nrules_file: null\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.programs_dir, temp.path().join("emus"));
        assert_eq!(config.rules_file, None);
    }
}
