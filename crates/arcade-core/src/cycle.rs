//! One refresh cycle: snapshot every root, re-catalog what changed, number
//! the result.
//!
//! Everything here works on values; publishing is the service's job.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use arcade_catalog::{CatalogEntry, Cataloger, RootId, allocate};
use arcade_fs::{DirectorySnapshot, NormalizedPath, Volume, VolumeSource, changed, snapshot};
use arcade_launch::{InstalledPrograms, Resolver};
use arcade_rules::RuleTable;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::state::{CatalogSnapshot, CycleReport, ProgramsFingerprint, RootFailure, RootState};

/// What a cycle reads besides the previous snapshot.
pub(crate) struct CycleInputs<'a> {
    pub config: &'a EngineConfig,
    pub rules: &'a RuleTable,
    pub cataloger: &'a Cataloger,
    pub volumes: &'a dyn VolumeSource,
}

/// Build the next snapshot from `prev`.
pub(crate) fn run(inputs: &CycleInputs<'_>, prev: &CatalogSnapshot) -> (CatalogSnapshot, CycleReport) {
    let config = inputs.config;

    let programs = fingerprint(config);
    let programs_changed = programs.differs_from(&prev.programs);
    if programs_changed {
        debug!("installed programs changed, re-cataloging every root");
    }
    let installed = InstalledPrograms::discover(&config.programs_dir, &config.artifacts_dir);
    let resolver = Resolver::new(inputs.rules, &installed);

    let volumes = inputs.volumes.list_volumes();
    log_volume_changes(&prev.volumes, &volumes);

    let mut targets = vec![(RootId::Library, config.library_root.clone())];
    targets.extend(
        volumes
            .iter()
            .map(|v| (RootId::Volume(v.mount_path.clone()), v.mount_path.to_native())),
    );

    let mut roots = BTreeMap::new();
    let mut rescanned = Vec::new();
    let mut reused = Vec::new();
    let mut failures = Vec::new();

    for (root, path) in targets {
        let current = match snapshot(&path) {
            Ok(current) => current,
            Err(e) => {
                warn!(%root, error = %e, "scan failed, dropping root from the index");
                failures.push(RootFailure::new(root, &e));
                continue;
            }
        };

        let entries = match prev.roots.get(&root) {
            Some(previous) if !programs_changed && !changed(&previous.snapshot, &current) => {
                debug!(%root, "root unchanged");
                reused.push(root.clone());
                Arc::clone(&previous.entries)
            }
            _ => {
                let entries = inputs
                    .cataloger
                    .catalog(&root, &current, inputs.rules, &resolver);
                rescanned.push(root.clone());
                Arc::new(entries.into_iter().map(Arc::new).collect::<Vec<_>>())
            }
        };
        roots.insert(
            root,
            RootState {
                snapshot: current,
                entries,
            },
        );
    }

    for root in prev.roots.keys().filter(|root| !roots.contains_key(*root)) {
        debug!(%root, "root removed from the index");
    }

    let local = roots
        .get(&RootId::Library)
        .map(|state| state.entries.as_slice())
        .unwrap_or(&[]);
    let by_volume: BTreeMap<NormalizedPath, Vec<Arc<CatalogEntry>>> = roots
        .iter()
        .filter_map(|(root, state)| match root {
            RootId::Volume(mount) => Some((mount.clone(), state.entries.to_vec())),
            RootId::Library => None,
        })
        .collect();
    let index = allocate(local, &by_volume);

    let entries_changed = !index.same_entries(&prev.index);
    let index = if entries_changed {
        Arc::new(index)
    } else {
        Arc::clone(&prev.index)
    };
    let generation = index.generation();

    let published_at = Utc::now();
    let report = CycleReport {
        generation,
        entries: index.len(),
        changed: entries_changed,
        rescanned,
        reused,
        failed: failures.clone(),
        programs_changed,
        published_at,
    };
    let next = CatalogSnapshot {
        generation,
        published_at,
        index,
        volumes,
        roots,
        programs,
        failures,
    };

    info!(
        generation,
        entries = report.entries,
        rescanned = report.rescanned.len(),
        reused = report.reused.len(),
        failed = report.failed.len(),
        "refresh cycle complete"
    );
    (next, report)
}

fn fingerprint(config: &EngineConfig) -> ProgramsFingerprint {
    ProgramsFingerprint {
        programs: snapshot_or_empty(&config.programs_dir),
        artifacts: snapshot_or_empty(&config.artifacts_dir),
    }
}

fn snapshot_or_empty(dir: &Path) -> DirectorySnapshot {
    snapshot(dir).unwrap_or_else(|e| {
        debug!(error = %e, "programs directory not scanned");
        DirectorySnapshot::empty(dir)
    })
}

fn log_volume_changes(previous: &[Volume], current: &[Volume]) {
    let before: BTreeSet<_> = previous.iter().map(|v| &v.mount_path).collect();
    let after: BTreeSet<_> = current.iter().map(|v| &v.mount_path).collect();

    for volume in current.iter().filter(|v| !before.contains(&v.mount_path)) {
        info!(
            mount = %volume.mount_path,
            total_bytes = volume.total_bytes,
            free_bytes = volume.free_bytes,
            "volume attached"
        );
    }
    for mount in before.difference(&after) {
        info!(%mount, "volume detached");
    }
}
