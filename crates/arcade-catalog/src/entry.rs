//! Catalog entry types

use std::fmt;
use std::path::PathBuf;

use arcade_fs::NormalizedPath;
use serde::Serialize;

/// Identifies a scanned root.
///
/// Ordering puts the local library before every volume and volumes in mount
/// path order, which is the numbering order of the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootId {
    /// The fixed local library
    Library,
    /// A removable volume, by canonical mount path
    Volume(NormalizedPath),
}

impl RootId {
    pub fn is_volume(&self) -> bool {
        matches!(self, Self::Volume(_))
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => f.write_str("library"),
            Self::Volume(mount) => write!(f, "volume {mount}"),
        }
    }
}

/// A discovered media file. Superseded on rescan, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub source: RootId,
    pub path: PathBuf,
    /// File name without extension
    pub display_name: String,
    /// Lowercase extension without the dot
    pub extension: String,
    /// System name from the matching rule
    pub system: String,
    /// Whether a launcher resolved for this file when it was cataloged
    pub runnable: bool,
}
