//! Results of launch requests

use std::sync::Arc;

use arcade_catalog::CatalogEntry;
use arcade_launch::{LaunchError, LaunchReceipt, ResolutionFailure, ResolvedLaunch};
use arcade_rules::RuleEntry;

/// Outcome of `resolve_and_launch`. Captures start-time results only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The program was started
    Started {
        entry: Arc<CatalogEntry>,
        launch: ResolvedLaunch,
        receipt: LaunchReceipt,
    },
    /// No launcher could be resolved for the entry
    ResolutionFailed {
        entry: Arc<CatalogEntry>,
        failure: ResolutionFailure,
    },
    /// A launcher was resolved but failed to start
    LaunchFailed {
        entry: Arc<CatalogEntry>,
        launch: ResolvedLaunch,
        error: LaunchError,
    },
    /// The number is not in the current index
    UnknownNumber { number: usize, available: usize },
    /// The caller's index generation is no longer current
    StaleIndex { requested: u64, current: u64 },
}

impl LaunchOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    /// The entry the request referred to, when it was found
    pub fn entry(&self) -> Option<&Arc<CatalogEntry>> {
        match self {
            Self::Started { entry, .. }
            | Self::ResolutionFailed { entry, .. }
            | Self::LaunchFailed { entry, .. } => Some(entry),
            Self::UnknownNumber { .. } | Self::StaleIndex { .. } => None,
        }
    }
}

/// An entry together with a preview of how it would launch.
#[derive(Debug, Clone)]
pub struct EntryDescription {
    pub number: usize,
    pub generation: u64,
    pub entry: Arc<CatalogEntry>,
    /// Rule matching the entry's extension
    pub rule: Option<RuleEntry>,
    /// What `resolve_and_launch` would do right now
    pub resolution: Result<ResolvedLaunch, ResolutionFailure>,
}
