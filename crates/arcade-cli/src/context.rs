//! Engine configuration and service construction for a CLI invocation
//!
//! The configuration comes from, in order:
//! - `--config <file>`
//! - `--root <dir>` (or `ARCADE_ROOT`), using `<dir>/arcade.toml` when present
//! - the per-user config file, when it exists
//! - the current directory as project root

use std::path::Path;
use std::sync::Arc;

use arcade_core::{CatalogService, EngineConfig};
use arcade_fs::{Volume, VolumeSource};

use crate::error::Result;

/// Volume source reporting nothing, for `--no-volumes`.
struct NoVolumes;

impl VolumeSource for NoVolumes {
    fn list_volumes(&self) -> Vec<Volume> {
        Vec::new()
    }
}

/// Work out the engine configuration for this invocation.
pub fn resolve_config(root: Option<&Path>, config: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = config {
        tracing::debug!(path = %path.display(), "using explicit config");
        return Ok(EngineConfig::load(path)?);
    }
    if let Some(root) = root {
        return Ok(EngineConfig::for_root(root)?);
    }
    if let Some(path) = EngineConfig::user_config_path().filter(|p| p.is_file()) {
        tracing::debug!(path = %path.display(), "using user config");
        return Ok(EngineConfig::load(&path)?);
    }
    let cwd = std::env::current_dir()?;
    Ok(EngineConfig::for_root(&cwd)?)
}

/// Build the catalog service for `config`.
pub fn build_service(config: EngineConfig, no_volumes: bool) -> Result<CatalogService> {
    let mut builder = CatalogService::builder(config);
    if no_volumes {
        builder = builder.volume_source(Arc::new(NoVolumes));
    }
    Ok(builder.build()?)
}
