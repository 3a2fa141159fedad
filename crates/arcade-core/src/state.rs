//! Published catalog state and cycle reports

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use arcade_catalog::{CatalogEntry, Index, RootId};
use arcade_fs::{DirectorySnapshot, ScanError, Volume};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scheduler state of the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Idle,
    Scanning,
    Publishing,
    Stopping,
    Stopped,
}

/// Per-root state kept between cycles.
#[derive(Debug, Clone)]
pub struct RootState {
    /// Snapshot the entries were cataloged from
    pub snapshot: DirectorySnapshot,
    /// Entries of this root, in path order
    pub entries: Arc<Vec<Arc<CatalogEntry>>>,
}

/// Snapshots of the programs and artifacts directories.
#[derive(Debug, Clone)]
pub struct ProgramsFingerprint {
    pub programs: DirectorySnapshot,
    pub artifacts: DirectorySnapshot,
}

impl ProgramsFingerprint {
    pub fn empty() -> Self {
        Self {
            programs: DirectorySnapshot::empty(""),
            artifacts: DirectorySnapshot::empty(""),
        }
    }

    /// True when either directory changed.
    pub fn differs_from(&self, other: &ProgramsFingerprint) -> bool {
        arcade_fs::changed(&self.programs, &other.programs)
            || arcade_fs::changed(&self.artifacts, &other.artifacts)
    }
}

/// A root that could not be scanned in a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootFailure {
    pub root: RootId,
    pub error: String,
}

impl RootFailure {
    pub fn new(root: RootId, error: &ScanError) -> Self {
        Self {
            root,
            error: error.to_string(),
        }
    }
}

/// Immutable result of one committed refresh cycle.
///
/// Readers hold an `Arc` to it; the next cycle builds a new one and swaps it
/// in, so a reader always sees one cycle's state in full.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Content fingerprint of the index; changes only with its entries
    pub generation: u64,
    pub published_at: DateTime<Utc>,
    pub index: Arc<Index>,
    /// Volumes attached during the cycle
    pub volumes: Vec<Volume>,
    /// Successfully scanned roots
    pub roots: BTreeMap<RootId, RootState>,
    pub programs: ProgramsFingerprint,
    /// Roots that failed to scan in the cycle
    pub failures: Vec<RootFailure>,
}

impl CatalogSnapshot {
    /// State before any cycle has run
    pub fn initial() -> Self {
        Self {
            generation: 0,
            published_at: Utc::now(),
            index: Arc::new(Index::empty()),
            volumes: Vec::new(),
            roots: BTreeMap::new(),
            programs: ProgramsFingerprint::empty(),
            failures: Vec::new(),
        }
    }
}

/// Summary of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub generation: u64,
    pub entries: usize,
    /// Whether the numbered entry list changed
    pub changed: bool,
    /// Roots that were (re)cataloged
    pub rescanned: Vec<RootId>,
    /// Roots whose previous entries were reused
    pub reused: Vec<RootId>,
    /// Roots that failed and were dropped
    pub failed: Vec<RootFailure>,
    /// Whether installed programs changed since the previous cycle
    pub programs_changed: bool,
    pub published_at: DateTime<Utc>,
}

/// How `stop` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReport {
    /// The worker finished within the timeout
    Clean,
    /// The worker did not finish in time and was left to exit on its own
    TimedOut { waited: Duration },
    /// No worker was running
    NotRunning,
}
