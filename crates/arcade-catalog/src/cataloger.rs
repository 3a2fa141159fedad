//! Snapshot → catalog entries

use std::path::Path;

use arcade_fs::DirectorySnapshot;
use arcade_rules::{RuleEntry, RuleTable};
use tracing::debug;

use crate::entry::{CatalogEntry, RootId};

/// File name suffixes of sidecar metadata that are never media
pub const DEFAULT_METADATA_SUFFIXES: &[&str] = &["_metadata.json", ".json"];

/// Answers whether a file could be launched right now.
///
/// Implemented by the resolver; tests use closures.
pub trait LaunchAvailability {
    fn is_runnable(&self, rule: &RuleEntry, file: &Path) -> bool;
}

impl<F> LaunchAvailability for F
where
    F: Fn(&RuleEntry, &Path) -> bool,
{
    fn is_runnable(&self, rule: &RuleEntry, file: &Path) -> bool {
        self(rule, file)
    }
}

/// Produces catalog entries from directory snapshots.
#[derive(Debug, Clone)]
pub struct Cataloger {
    metadata_suffixes: Vec<String>,
}

impl Default for Cataloger {
    fn default() -> Self {
        Self::new(DEFAULT_METADATA_SUFFIXES.iter().map(|s| s.to_string()))
    }
}

impl Cataloger {
    pub fn new(metadata_suffixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            metadata_suffixes: metadata_suffixes
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// Catalog every file of `snapshot` that has a rule.
    ///
    /// Directories, reserved metadata files and files whose extension has no
    /// rule are skipped. Entries come out in path order.
    pub fn catalog(
        &self,
        root: &RootId,
        snapshot: &DirectorySnapshot,
        rules: &RuleTable,
        availability: &dyn LaunchAvailability,
    ) -> Vec<CatalogEntry> {
        let entries: Vec<_> = snapshot
            .files()
            .filter(|path| !self.is_metadata(path))
            .filter_map(|path| {
                let extension = path.extension()?.to_str()?.to_lowercase();
                let rule = rules.get(&extension)?;
                let display_name = path.file_stem()?.to_string_lossy().into_owned();
                Some(CatalogEntry {
                    source: root.clone(),
                    path: path.to_path_buf(),
                    display_name,
                    extension: rule.extension.clone(),
                    system: rule.system.clone(),
                    runnable: availability.is_runnable(rule, path),
                })
            })
            .collect();

        debug!(%root, files = snapshot.files().count(), entries = entries.len(), "cataloged root");
        entries
    }

    fn is_metadata(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let name = name.to_lowercase();
        self.metadata_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }
}
