//! Rules file overrides merged over the built-in table

use std::fs;

use arcade_rules::{BUILTIN_RULE_COUNT, ConfigError, RuleLoader, RuleTable};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(temp: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_override_replaces_builtin_rule() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "rules.toml",
        r#"
[[rules]]
extension = ".nes"
system = "Famicom"
program = "nestopia"
label = "Nestopia"
template = '"{program}" --fullscreen "{file}"'
"#,
    );

    let (table, report) = RuleLoader::new().load_table(Some(&path)).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.rules, 1);
    assert_eq!(table.len(), BUILTIN_RULE_COUNT);

    let nes = table.get("nes").unwrap();
    assert_eq!(nes.label, "Nestopia");
    assert_eq!(nes.system, "Famicom");
    assert!(nes.runner.is_none());
}

#[test]
fn test_new_rule_and_runner() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "rules.toml",
        r#"
[[runners]]
id = "mednafen"
program = "mednafen"
label = "Mednafen"
template = '"{runner}" "{file}"'

[[rules]]
extension = "pce"
system = "PC Engine"
runner = "mednafen"
artifact = "pce.cfg"
template = '"{file}"'
"#,
    );

    let (table, report) = RuleLoader::new().load_table(Some(&path)).unwrap();
    assert_eq!(report.errors, Vec::<ConfigError>::new());
    assert_eq!(report.runners, 1);
    assert_eq!(table.len(), BUILTIN_RULE_COUNT + 1);
    assert_eq!(table.get("PCE").unwrap().runner.as_ref().unwrap().runner, "mednafen");
    assert_eq!(table.runner("mednafen").unwrap().label, "Mednafen");
}

#[test]
fn test_invalid_entries_are_excluded_and_reported() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "rules.toml",
        r#"
[[rules]]
extension = "vb"
program = "mednafen"
template = '"{program}"'

[[rules]]
template = '"{file}"'
self_executing = true

[[rules]]
extension = "ws"
program = "oswan"
runner = "nonexistent"
artifact = "ws.so"
template = '"{program}" "{file}"'

[[rules]]
extension = "lnx"
program = "handy"
template = '"{program}" "{file}"'
"#,
    );

    let mut table = RuleTable::new();
    let report = RuleLoader::new().load_into(&path, &mut table).unwrap();

    assert_eq!(report.rules, 1);
    assert_eq!(report.errors.len(), 3);
    assert!(matches!(report.errors[0], ConfigError::MissingPlaceholder { .. }));
    assert!(matches!(report.errors[1], ConfigError::MissingField { field: "extension", .. }));
    assert!(matches!(report.errors[2], ConfigError::UnknownRunner { .. }));
    assert_eq!(report.errors[2].entry(), "rules[2] (.ws)");
    assert_eq!(table.extensions(), vec!["lnx"]);
}

#[test]
fn test_yaml_rules_file() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "rules.yaml",
        r#"
rules:
  - extension: a26
    system: Atari 2600
    program: stella
    template: '"{program}" "{file}"'
"#,
    );

    let mut table = RuleTable::new();
    let report = RuleLoader::new().load_into(&path, &mut table).unwrap();
    assert!(report.is_clean());
    assert_eq!(table.get("a26").unwrap().system, "Atari 2600");
}
