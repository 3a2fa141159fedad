//! Deterministic numbering of catalog entries

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arcade_fs::NormalizedPath;
use sha2::{Digest, Sha256};

use crate::entry::{CatalogEntry, RootId};

/// Ordered mapping from 1-based number to catalog entry.
///
/// Library entries come first in path order, then each volume in mount path
/// order with its entries in path order. Numbers are only meaningful for the
/// index they came from; `generation` tells indexes apart.
///
/// The generation is derived from the numbered entries, so two processes
/// cataloging the same tree agree on it and any change to the numbering
/// changes it. The empty index is generation 0.
#[derive(Debug, Clone, Default)]
pub struct Index {
    generation: u64,
    entries: Vec<Arc<CatalogEntry>>,
}

impl Index {
    /// An empty index with generation 0
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get the entry numbered `number` (1-based).
    pub fn get(&self, number: usize) -> Option<&Arc<CatalogEntry>> {
        number.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Number of the entry for `path`, if present.
    pub fn number_of(&self, path: &Path) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.path == path)
            .map(|i| i + 1)
    }

    /// Iterate over `(number, entry)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<CatalogEntry>)> {
        self.entries.iter().enumerate().map(|(i, entry)| (i + 1, entry))
    }

    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when both indexes number the same entries the same way,
    /// regardless of generation.
    pub fn same_entries(&self, other: &Index) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}

/// Build an index from the library's entries and each volume's entries.
///
/// Input order within each list does not matter.
pub fn allocate(
    local: &[Arc<CatalogEntry>],
    volumes: &BTreeMap<NormalizedPath, Vec<Arc<CatalogEntry>>>,
) -> Index {
    let mut entries = Vec::with_capacity(local.len() + volumes.values().map(Vec::len).sum::<usize>());

    entries.extend(sorted_by_path(local));
    for volume_entries in volumes.values() {
        entries.extend(sorted_by_path(volume_entries));
    }

    Index {
        generation: fingerprint(&entries),
        entries,
    }
}

fn fingerprint(entries: &[Arc<CatalogEntry>]) -> u64 {
    if entries.is_empty() {
        return 0;
    }

    let mut hasher = Sha256::new();
    for entry in entries {
        match &entry.source {
            RootId::Library => hasher.update(b"L"),
            RootId::Volume(mount) => {
                hasher.update(b"V");
                hasher.update(mount.as_str().as_bytes());
            }
        }
        for field in [
            &*entry.path.to_string_lossy(),
            entry.display_name.as_str(),
            entry.extension.as_str(),
            entry.system.as_str(),
        ] {
            hasher.update([0u8]);
            hasher.update(field.as_bytes());
        }
        hasher.update([0u8, u8::from(entry.runnable), b'\n']);
    }

    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    // 0 is reserved for the empty index
    u64::from_be_bytes(head).max(1)
}

fn sorted_by_path(entries: &[Arc<CatalogEntry>]) -> Vec<Arc<CatalogEntry>> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn entry(root: &RootId, path: &str) -> Arc<CatalogEntry> {
        let path = PathBuf::from(path);
        Arc::new(CatalogEntry {
            source: root.clone(),
            display_name: path.file_stem().unwrap().to_string_lossy().into_owned(),
            extension: "nes".into(),
            system: "NES".into(),
            runnable: true,
            path,
        })
    }

    fn paths(index: &Index) -> Vec<String> {
        index
            .iter()
            .map(|(_, e)| e.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_library_before_volumes() {
        let vol_b = NormalizedPath::new("/media/b");
        let vol_a = NormalizedPath::new("/media/a");
        let local = vec![entry(&RootId::Library, "/games/z.nes"), entry(&RootId::Library, "/games/a.nes")];
        let mut volumes = BTreeMap::new();
        volumes.insert(vol_b.clone(), vec![entry(&RootId::Volume(vol_b), "/media/b/x.nes")]);
        volumes.insert(vol_a.clone(), vec![entry(&RootId::Volume(vol_a), "/media/a/y.nes")]);

        let index = allocate(&local, &volumes);
        assert_eq!(
            paths(&index),
            vec!["/games/a.nes", "/games/z.nes", "/media/a/y.nes", "/media/b/x.nes"]
        );
    }

    #[test]
    fn test_numbers_are_one_based() {
        let local = vec![entry(&RootId::Library, "/games/a.nes")];
        let index = allocate(&local, &BTreeMap::new());
        assert!(index.get(0).is_none());
        assert_eq!(index.get(1).unwrap().display_name, "a");
        assert!(index.get(2).is_none());
        assert_eq!(index.number_of(Path::new("/games/a.nes")), Some(1));
    }

    #[test]
    fn test_same_entries_compares_content() {
        let local = vec![entry(&RootId::Library, "/games/a.nes")];
        let a = allocate(&local, &BTreeMap::new());
        let b = allocate(&[entry(&RootId::Library, "/games/a.nes")], &BTreeMap::new());
        assert!(a.same_entries(&b));
        assert!(!a.same_entries(&Index::empty()));
    }

    #[test]
    fn test_generation_follows_content() {
        let a = allocate(&[entry(&RootId::Library, "/games/a.nes")], &BTreeMap::new());
        let again = allocate(&[entry(&RootId::Library, "/games/a.nes")], &BTreeMap::new());
        assert_eq!(a.generation(), again.generation());
        assert_ne!(a.generation(), 0);
        assert_eq!(Index::empty().generation(), 0);
        assert_eq!(allocate(&[], &BTreeMap::new()).generation(), 0);

        let shifted = allocate(
            &[
                entry(&RootId::Library, "/games/0.nes"),
                entry(&RootId::Library, "/games/a.nes"),
            ],
            &BTreeMap::new(),
        );
        assert_ne!(a.generation(), shifted.generation());

        let mut unrunnable = (*entry(&RootId::Library, "/games/a.nes")).clone();
        unrunnable.runnable = false;
        let changed = allocate(&[Arc::new(unrunnable)], &BTreeMap::new());
        assert_ne!(a.generation(), changed.generation());
    }

    #[test]
    fn test_generation_depends_on_root() {
        let usb = NormalizedPath::new("/media/usb");
        let local = allocate(&[entry(&RootId::Library, "/media/usb/a.nes")], &BTreeMap::new());
        let mut volumes = BTreeMap::new();
        volumes.insert(usb.clone(), vec![entry(&RootId::Volume(usb), "/media/usb/a.nes")]);
        let on_volume = allocate(&[], &volumes);
        assert_ne!(local.generation(), on_volume.generation());
    }
}
