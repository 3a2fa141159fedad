//! Change-aware directory snapshots
//!
//! A snapshot records every path below a root together with its last-modified
//! time. Comparing two snapshots of the same root tells the catalog whether a
//! rescan is needed at all.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ScanError;

/// Whether a snapshot entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One recorded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub modified: SystemTime,
    pub kind: EntryKind,
}

/// A path below the root that could not be read during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Complete path → modification time mapping for one root.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    root: PathBuf,
    entries: BTreeMap<PathBuf, SnapshotEntry>,
    skipped: Vec<SkippedEntry>,
}

impl DirectorySnapshot {
    /// An empty snapshot of `root`, used when nothing has been observed yet.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Root the snapshot was taken from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All recorded paths in path order
    pub fn entries(&self) -> &BTreeMap<PathBuf, SnapshotEntry> {
        &self.entries
    }

    /// Paths that could not be read
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Iterate over regular files in path order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kind == EntryKind::File)
            .map(|(path, _)| path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a snapshot from pre-computed entries.
    pub fn from_entries(
        root: impl Into<PathBuf>,
        entries: impl IntoIterator<Item = (PathBuf, SnapshotEntry)>,
    ) -> Self {
        Self {
            root: root.into(),
            entries: entries.into_iter().collect(),
            skipped: Vec::new(),
        }
    }
}

/// Walk `root` recursively and record every file and directory below it.
///
/// Symbolic links are followed. Entries that cannot be read (permission
/// denied, dangling links, link loops) are recorded in
/// [`DirectorySnapshot::skipped`] and the walk continues. Only a missing or
/// unlistable root is an error.
pub fn snapshot(root: &Path) -> Result<DirectorySnapshot, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootMissing {
            root: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|e| ScanError::RootUnreadable {
        root: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut entries = BTreeMap::new();
    let mut skipped = Vec::new();

    for item in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::RootUnreadable {
                    root: root.to_path_buf(),
                    message: err.to_string(),
                });
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                skipped.push(SkippedEntry {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let modified = match entry.metadata().map_err(|e| e.to_string()).and_then(|meta| {
            meta.modified().map_err(|e| e.to_string())
        }) {
            Ok(modified) => modified,
            Err(reason) => {
                warn!(path = %entry.path().display(), %reason, "could not read modification time");
                skipped.push(SkippedEntry {
                    path: entry.into_path(),
                    reason,
                });
                continue;
            }
        };

        let kind = if entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.insert(entry.into_path(), SnapshotEntry { modified, kind });
    }

    if !root.is_dir() {
        return Err(ScanError::RootMissing {
            root: root.to_path_buf(),
        });
    }

    debug!(
        root = %root.display(),
        entries = entries.len(),
        skipped = skipped.len(),
        "snapshot complete"
    );

    Ok(DirectorySnapshot {
        root: root.to_path_buf(),
        entries,
        skipped,
    })
}

/// True iff the key sets differ or any shared path's modification time differs.
pub fn changed(prev: &DirectorySnapshot, curr: &DirectorySnapshot) -> bool {
    prev.entries.len() != curr.entries.len()
        || prev
            .entries
            .iter()
            .zip(curr.entries.iter())
            .any(|((prev_path, prev_entry), (curr_path, curr_entry))| {
                prev_path != curr_path || prev_entry.modified != curr_entry.modified
            })
}
