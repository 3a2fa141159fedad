//! Loader for rules files
//!
//! A rules file extends or overrides the table it is loaded into. Runners
//! are applied first so rules in the same file can reference them. Invalid
//! entries are logged, reported and skipped; only an unreadable or
//! unparseable file fails the load.

use std::path::{Path, PathBuf};

use arcade_fs::ConfigStore;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::schema::{RawRule, RawRunner, RulesFile};
use crate::table::RuleTable;
use crate::validation::{rule_label, runner_label, validate_rule, validate_runner};

/// Outcome of loading one rules file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// File that was loaded
    pub source: PathBuf,
    /// Rules added or replaced
    pub rules: usize,
    /// Runners added or replaced
    pub runners: usize,
    /// Entries excluded from the table
    pub errors: Vec<ConfigError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads rules files (TOML, JSON or YAML) into a [`RuleTable`].
#[derive(Debug, Default)]
pub struct RuleLoader {
    store: ConfigStore,
}

impl RuleLoader {
    /// Create a new RuleLoader
    pub fn new() -> Self {
        Self {
            store: ConfigStore::new(),
        }
    }

    /// Load `path` into `table`.
    ///
    /// A missing file is not an error and leaves the table untouched.
    pub fn load_into(&self, path: &Path, table: &mut RuleTable) -> Result<LoadReport> {
        let mut report = LoadReport {
            source: path.to_path_buf(),
            ..LoadReport::default()
        };
        if !path.exists() {
            debug!(path = %path.display(), "no rules file");
            return Ok(report);
        }

        let file: RulesFile = self.store.load(path)?;
        self.apply(file, table, &mut report);

        debug!(
            path = %path.display(),
            rules = report.rules,
            runners = report.runners,
            rejected = report.errors.len(),
            "loaded rules file"
        );
        Ok(report)
    }

    /// Build the built-in table and overlay `path` when given.
    pub fn load_table(&self, path: Option<&Path>) -> Result<(RuleTable, LoadReport)> {
        let mut table = RuleTable::with_builtins();
        let report = match path {
            Some(path) => self.load_into(path, &mut table)?,
            None => LoadReport::default(),
        };
        Ok((table, report))
    }

    fn apply(&self, file: RulesFile, table: &mut RuleTable, report: &mut LoadReport) {
        for (index, value) in file.runners.into_iter().enumerate() {
            let raw: RawRunner = match decode("runners", index, value) {
                Ok(raw) => raw,
                Err(e) => {
                    reject(report, e);
                    continue;
                }
            };
            let entry = runner_label(index, &raw);
            match validate_runner(&entry, &raw) {
                Ok(runner) => {
                    table.insert_runner(runner);
                    report.runners += 1;
                }
                Err(e) => reject(report, e),
            }
        }

        for (index, value) in file.rules.into_iter().enumerate() {
            let raw: RawRule = match decode("rules", index, value) {
                Ok(raw) => raw,
                Err(e) => {
                    reject(report, e);
                    continue;
                }
            };
            let entry = rule_label(index, &raw);
            let rule = match validate_rule(&entry, &raw) {
                Ok(rule) => rule,
                Err(e) => {
                    reject(report, e);
                    continue;
                }
            };
            if let Some(link) = &rule.runner {
                if table.runner(&link.runner).is_none() {
                    reject(
                        report,
                        ConfigError::UnknownRunner {
                            entry,
                            runner: link.runner.clone(),
                        },
                    );
                    continue;
                }
            }
            table.insert_rule(rule);
            report.rules += 1;
        }
    }
}

/// Decode one untyped entry; a type mismatch only rejects that entry.
fn decode<T: DeserializeOwned>(
    section: &str,
    index: usize,
    value: serde_json::Value,
) -> std::result::Result<T, ConfigError> {
    serde_json::from_value(value).map_err(|e| ConfigError::Malformed {
        entry: format!("{section}[{index}]"),
        message: e.to_string(),
    })
}

fn reject(report: &mut LoadReport, error: ConfigError) {
    warn!(path = %report.source.display(), %error, "excluding invalid rules entry");
    report.errors.push(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_report() {
        let temp = TempDir::new().unwrap();
        let mut table = RuleTable::new();
        let report = RuleLoader::new()
            .load_into(&temp.path().join("rules.toml"), &mut table)
            .unwrap();
        assert!(report.is_clean());
        assert_eq!(report.rules, 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_table_without_file() {
        let (table, report) = RuleLoader::new().load_table(None).unwrap();
        assert_eq!(table.len(), crate::BUILTIN_RULE_COUNT);
        assert!(report.is_clean());
    }

    #[test]
    fn test_unparseable_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        std::fs::write(&path, "[[rules]\nextension = ").unwrap();
        let mut table = RuleTable::new();
        assert!(RuleLoader::new().load_into(&path, &mut table).is_err());
    }

    #[test]
    fn test_mistyped_field_rejects_only_its_entry() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        std::fs::write(
            &path,
            r#"
[[runners]]
id = 7
program = "retroarch"
template = '"{runner}" "{file}"'

[[rules]]
extension = "cue"
program = "duckstation"
template = '"{program}" "{file}"'

[[rules]]
extension = "iso"
template = '"{file}"'
self_executing = "yes"
"#,
        )
        .unwrap();

        let mut table = RuleTable::new();
        let report = RuleLoader::new().load_into(&path, &mut table).unwrap();

        assert_eq!(report.rules, 1);
        assert_eq!(report.runners, 0);
        assert!(table.contains("cue"));
        assert!(!table.contains("iso"));
        let entries: Vec<&str> = report.errors.iter().map(ConfigError::entry).collect();
        assert_eq!(entries, vec!["runners[0]", "rules[1]"]);
        assert!(
            report
                .errors
                .iter()
                .all(|e| matches!(e, ConfigError::Malformed { .. }))
        );
    }
}
