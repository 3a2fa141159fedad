//! Launch rules for Arcade
//!
//! A [`RuleTable`] maps a lowercase file extension to the [`RuleEntry`]
//! describing how files of that type are launched, plus the
//! [`SecondaryRunner`]s that rules may fall back to. The table starts from
//! the built-in definitions and can be extended or overridden from a rules
//! file through [`RuleLoader`]; entries that fail validation are excluded and
//! reported as [`ConfigError`]s.

pub mod builtins;
pub mod error;
pub mod loader;
pub mod schema;
pub mod table;
pub mod template;
pub mod validation;

pub use builtins::{BUILTIN_RULE_COUNT, DLL_SUFFIX, EXE_SUFFIX, builtin_rules, builtin_runners};
pub use error::{ConfigError, Error, Result};
pub use loader::{LoadReport, RuleLoader};
pub use schema::{RuleEntry, RunnerLink, SecondaryRunner};
pub use table::{RuleTable, normalize_extension};
pub use template::{Placeholder, Template, TemplateError};
