//! Secondary runner definition

use std::path::Path;

use serde::Serialize;

use crate::template::Template;

/// A generic program that launches many file types given a per-type artifact
/// (e.g. a multi-system frontend loading a core).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryRunner {
    pub id: String,
    /// Runner program, relative to the programs directory
    pub program: String,
    pub label: String,
    /// Invocation using `{runner}`, `{artifact}` and `{file}`
    pub template: Template,
}

impl SecondaryRunner {
    /// Launch label for a given artifact, e.g. `RetroArch (fceumm_libretro)`
    pub fn label_for(&self, artifact: &str) -> String {
        let stem = Path::new(artifact)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(artifact);
        format!("{} ({})", self.label, stem)
    }
}
