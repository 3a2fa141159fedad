//! Launch resolution
//!
//! For a file with a rule, in priority order:
//! 1. the rule's primary program, when installed
//! 2. the rule's secondary runner, when both the runner program and the
//!    rule's artifact are installed
//! 3. the file itself, when the rule is self-executing and the file exists

use std::path::Path;

use arcade_catalog::{CatalogEntry, LaunchAvailability};
use arcade_rules::{Placeholder, RuleEntry, RuleTable};
use tracing::debug;

use crate::error::ResolutionFailure;
use crate::programs::InstalledPrograms;
use crate::types::{LaunchKind, ResolvedLaunch};

/// Resolves files to launches against one rule table and one view of the
/// installed programs.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    rules: &'a RuleTable,
    programs: &'a InstalledPrograms,
}

impl<'a> Resolver<'a> {
    pub fn new(rules: &'a RuleTable, programs: &'a InstalledPrograms) -> Self {
        Self { rules, programs }
    }

    /// Resolve a catalog entry.
    pub fn resolve(&self, entry: &CatalogEntry) -> Result<ResolvedLaunch, ResolutionFailure> {
        self.resolve_file(&entry.path)
    }

    /// Resolve any file by its extension.
    pub fn resolve_file(&self, file: &Path) -> Result<ResolvedLaunch, ResolutionFailure> {
        let extension = file
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let rule = self
            .rules
            .get(&extension)
            .ok_or(ResolutionFailure::NoRule { extension })?;
        self.resolve_with(rule, file)
    }

    /// Resolve a file against a specific rule.
    pub fn resolve_with(
        &self,
        rule: &RuleEntry,
        file: &Path,
    ) -> Result<ResolvedLaunch, ResolutionFailure> {
        let file_arg = file.to_string_lossy();
        let file_arg: &str = &file_arg;

        if let Some(program) = rule.program.as_deref() {
            if let Some(program_path) = self.programs.program_path(program) {
                let program_arg = program_path.to_string_lossy();
                let argv = rule.template.render(&[
                    (Placeholder::Program, &*program_arg),
                    (Placeholder::File, file_arg),
                ]);
                debug!(file = %file.display(), program = %program_path.display(), "resolved primary program");
                return Ok(ResolvedLaunch::new(
                    rule.label.clone(),
                    LaunchKind::Primary,
                    argv,
                    file.to_path_buf(),
                ));
            }
        }

        if let Some(link) = &rule.runner {
            let runner = self.rules.runner(&link.runner);
            let runner_path = runner.and_then(|r| self.programs.program_path(&r.program));
            let artifact_path = self.programs.artifact_path(&link.artifact);
            if let (Some(runner), Some(runner_path), Some(artifact_path)) =
                (runner, runner_path, artifact_path)
            {
                let runner_arg = runner_path.to_string_lossy();
                let artifact_arg = artifact_path.to_string_lossy();
                let argv = runner.template.render(&[
                    (Placeholder::Runner, &*runner_arg),
                    (Placeholder::Artifact, &*artifact_arg),
                    (Placeholder::File, file_arg),
                ]);
                debug!(file = %file.display(), runner = %runner.id, artifact = %link.artifact, "resolved secondary runner");
                return Ok(ResolvedLaunch::new(
                    runner.label_for(&link.artifact),
                    LaunchKind::SecondaryRunner,
                    argv,
                    file.to_path_buf(),
                ));
            }
        }

        if rule.self_executing && file.is_file() {
            let argv = rule.template.render(&[(Placeholder::File, file_arg)]);
            return Ok(ResolvedLaunch::new(
                rule.label.clone(),
                LaunchKind::SelfExecuting,
                argv,
                file.to_path_buf(),
            ));
        }

        debug!(file = %file.display(), extension = %rule.extension, "no viable launcher");
        Err(ResolutionFailure::NoViableLauncher {
            path: file.to_path_buf(),
        })
    }
}

impl LaunchAvailability for Resolver<'_> {
    fn is_runnable(&self, rule: &RuleEntry, file: &Path) -> bool {
        self.resolve_with(rule, file).is_ok()
    }
}
