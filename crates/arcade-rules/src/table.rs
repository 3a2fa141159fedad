//! Rule table storage

use std::collections::BTreeMap;

use crate::builtins::{builtin_rules, builtin_runners};
use crate::schema::{RuleEntry, SecondaryRunner};

/// Normalize an extension for lookup: trimmed, lowercase, no leading dot.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Mapping from lowercase extension to launch rule, plus the secondary
/// runners those rules may reference.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: BTreeMap<String, RuleEntry>,
    runners: BTreeMap<String, SecondaryRunner>,
}

impl RuleTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-populated with all built-in rules and runners.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for runner in builtin_runners() {
            table.insert_runner(runner);
        }
        for rule in builtin_rules() {
            table.insert_rule(rule);
        }
        table
    }

    /// Register a rule, replacing any rule for the same extension.
    pub fn insert_rule(&mut self, rule: RuleEntry) -> Option<RuleEntry> {
        self.rules.insert(rule.extension.clone(), rule)
    }

    /// Register a runner, replacing any runner with the same id.
    pub fn insert_runner(&mut self, runner: SecondaryRunner) -> Option<SecondaryRunner> {
        self.runners.insert(runner.id.clone(), runner)
    }

    /// Get the rule for an extension (with or without the dot, any case).
    pub fn get(&self, extension: &str) -> Option<&RuleEntry> {
        self.rules.get(&normalize_extension(extension))
    }

    /// Check if an extension has a rule.
    pub fn contains(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }

    /// Get a runner by id.
    pub fn runner(&self, id: &str) -> Option<&SecondaryRunner> {
        self.runners.get(id)
    }

    /// All rules ordered by extension
    pub fn rules(&self) -> impl Iterator<Item = &RuleEntry> {
        self.rules.values()
    }

    /// All runners ordered by id
    pub fn runners(&self) -> impl Iterator<Item = &SecondaryRunner> {
        self.runners.values()
    }

    /// List all extensions (sorted).
    pub fn extensions(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// Get the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
