//! On-disk rules file format
//!
//! # Example TOML
//!
//! ```toml
//! [[runners]]
//! id = "retroarch"
//! program = "retroarch"
//! label = "RetroArch"
//! template = '"{runner}" -L "{artifact}" "{file}"'
//!
//! [[rules]]
//! extension = ".nes"
//! system = "Nintendo Entertainment System"
//! program = "nestopia"
//! label = "Nestopia"
//! template = '"{program}" "{file}"'
//! runner = "retroarch"
//! artifact = "nestopia_libretro.so"
//! ```
//!
//! Entries are kept untyped until each one is decoded on its own, and every
//! field of a decoded entry is optional, so one malformed entry can be
//! reported and skipped without rejecting the whole file.

use serde::Deserialize;
use serde_json::Value;

/// Top-level rules file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub runners: Vec<Value>,
    #[serde(default)]
    pub rules: Vec<Value>,
}

/// Unvalidated `[[rules]]` entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRule {
    pub extension: Option<String>,
    pub system: Option<String>,
    pub program: Option<String>,
    pub label: Option<String>,
    pub template: Option<String>,
    pub runner: Option<String>,
    pub artifact: Option<String>,
    #[serde(default)]
    pub self_executing: bool,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub notes: Option<String>,
}

/// Unvalidated `[[runners]]` entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRunner {
    pub id: Option<String>,
    pub program: Option<String>,
    pub label: Option<String>,
    pub template: Option<String>,
}
