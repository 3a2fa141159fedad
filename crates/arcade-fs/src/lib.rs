//! Filesystem layer for Arcade
//!
//! Provides platform-neutral path handling, format-agnostic config loading,
//! change-aware directory snapshots and removable volume detection.

pub mod config;
pub mod error;
pub mod path;
pub mod snapshot;
pub mod volume;

pub use config::ConfigStore;
pub use error::{Error, Result, ScanError};
pub use path::NormalizedPath;
pub use snapshot::{DirectorySnapshot, EntryKind, SkippedEntry, SnapshotEntry, changed, snapshot};
pub use volume::{
    MountPoint, MountSource, SystemMounts, Volume, VolumeSource, VolumeWatcher, VolumeWatcherConfig,
};
