//! Launch layer for Arcade
//!
//! - [`InstalledPrograms`]: what is present in the programs and artifacts
//!   directories
//! - [`Resolver`]: picks the launcher for a catalog entry
//! - [`Launcher`]: starts the resolved command

pub mod error;
pub mod launcher;
pub mod programs;
pub mod resolver;
pub mod types;

pub use error::{LaunchError, ResolutionFailure, Result};
pub use launcher::{Launcher, ProcessLauncher};
pub use programs::InstalledPrograms;
pub use resolver::Resolver;
pub use types::{LaunchKind, LaunchReceipt, ResolvedLaunch, display_command};
