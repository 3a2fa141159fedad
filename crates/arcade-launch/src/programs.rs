//! Installed program discovery
//!
//! Programs and runner artifacts are identified by their path relative to
//! the programs or artifacts directory, with forward slashes
//! (e.g. `snes9x.exe`, `mgba/mGBA.app`).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use arcade_fs::NormalizedPath;
use arcade_rules::EXE_SUFFIX;
use tracing::debug;
use walkdir::WalkDir;

/// How deep below the programs directory programs are looked up
const MAX_DEPTH: usize = 3;

/// The programs and artifacts present on disk at discovery time.
#[derive(Debug, Clone, Default)]
pub struct InstalledPrograms {
    programs_dir: PathBuf,
    artifacts_dir: PathBuf,
    programs: BTreeSet<String>,
    artifacts: BTreeSet<String>,
}

impl InstalledPrograms {
    /// Discover what is installed.
    ///
    /// Missing directories simply contribute nothing.
    pub fn discover(programs_dir: &Path, artifacts_dir: &Path) -> Self {
        let programs = list_relative(programs_dir);
        let artifacts = list_relative(artifacts_dir);
        debug!(
            programs_dir = %programs_dir.display(),
            programs = programs.len(),
            artifacts = artifacts.len(),
            "discovered installed programs"
        );
        Self {
            programs_dir: programs_dir.to_path_buf(),
            artifacts_dir: artifacts_dir.to_path_buf(),
            programs,
            artifacts,
        }
    }

    /// Get the programs directory
    pub fn programs_dir(&self) -> &Path {
        &self.programs_dir
    }

    /// Get the artifacts directory
    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    /// Full path of an installed program.
    ///
    /// `name` may omit the platform executable suffix.
    pub fn program_path(&self, name: &str) -> Option<PathBuf> {
        lookup(&self.programs, &self.programs_dir, name)
            .or_else(|| {
                if EXE_SUFFIX.is_empty() {
                    None
                } else {
                    lookup(&self.programs, &self.programs_dir, &format!("{name}{EXE_SUFFIX}"))
                }
            })
    }

    /// Full path of an installed artifact.
    pub fn artifact_path(&self, name: &str) -> Option<PathBuf> {
        lookup(&self.artifacts, &self.artifacts_dir, name)
    }

    /// Installed program names (sorted)
    pub fn programs(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(String::as_str)
    }

    /// Installed artifact names (sorted)
    pub fn artifacts(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(String::as_str)
    }
}

fn lookup(set: &BTreeSet<String>, dir: &Path, name: &str) -> Option<PathBuf> {
    let key = NormalizedPath::new(name);
    set.contains(key.as_str())
        .then(|| dir.join(key.to_native()))
}

/// Files below `dir`, plus `.app` bundles which count as programs although
/// they are directories.
fn list_relative(dir: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    if !dir.is_dir() {
        return names;
    }

    let mut walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(MAX_DEPTH)
        .follow_links(true)
        .into_iter();

    while let Some(item) = walker.next() {
        let Ok(entry) = item else {
            continue;
        };
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = NormalizedPath::new(relative);

        if entry.file_type().is_dir() {
            if relative.extension() == Some("app") {
                names.insert(relative.as_str().to_string());
                walker.skip_current_dir();
            }
        } else {
            names.insert(relative.as_str().to_string());
        }
    }
    names
}
