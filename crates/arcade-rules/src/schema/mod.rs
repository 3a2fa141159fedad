//! Rule schema
//!
//! Validated types ([`RuleEntry`], [`SecondaryRunner`]) and the loosely
//! typed on-disk form ([`RulesFile`]) they are validated from.

mod file;
mod rule;
mod runner;

pub use file::{RawRule, RawRunner, RulesFile};
pub use rule::{RuleEntry, RunnerLink};
pub use runner::SecondaryRunner;
