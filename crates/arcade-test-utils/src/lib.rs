//! Shared test utilities for the arcade workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`library`] — [`TestLibrary`] builder for an on-disk project root
//! - [`volumes`] — [`StaticVolumes`], a scriptable volume source
//! - [`launcher`] — [`RecordingLauncher`], a launcher that records instead of spawning

pub mod launcher;
pub mod library;
pub mod volumes;

pub use launcher::RecordingLauncher;
pub use library::TestLibrary;
pub use volumes::StaticVolumes;
