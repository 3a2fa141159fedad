//! Catalog layer for Arcade
//!
//! Turns directory snapshots into [`CatalogEntry`] values using the rule
//! table, and numbers the entries of every root into one [`Index`].

pub mod cataloger;
pub mod entry;
pub mod index;

pub use cataloger::{Cataloger, DEFAULT_METADATA_SUFFIXES, LaunchAvailability};
pub use entry::{CatalogEntry, RootId};
pub use index::{Index, allocate};
