//! Core orchestration layer for Arcade
//!
//! [`CatalogService`] ties the layers together: a background worker
//! snapshots the library and every attached volume, re-catalogs roots that
//! changed, numbers the result and publishes it as an immutable
//! [`CatalogSnapshot`]. Foreground callers read the published snapshot and
//! launch entries by number.

pub mod config;
mod cycle;
pub mod error;
pub mod outcome;
pub mod service;
pub mod state;

pub use config::{CONFIG_FILE, CatalogSettings, EngineConfig, VolumeSettings};
pub use error::{Error, Result};
pub use outcome::{EntryDescription, LaunchOutcome};
pub use service::{CatalogService, CatalogServiceBuilder};
pub use state::{
    CatalogSnapshot, CycleReport, ProgramsFingerprint, RootFailure, RootState, ServiceState,
    ShutdownReport,
};
