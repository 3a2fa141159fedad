//! Volumes command implementation

use arcade_catalog::RootId;
use arcade_core::CatalogService;
use colored::Colorize;
use serde_json::json;

use crate::error::Result;

/// Run the volumes command
pub fn run_volumes(service: &CatalogService, json: bool) -> Result<()> {
    let snapshot = service.snapshot();

    if json {
        let volumes: Vec<_> = snapshot
            .volumes
            .iter()
            .map(|volume| {
                let root = RootId::Volume(volume.mount_path.clone());
                json!({
                    "mount_path": volume.mount_path.as_str(),
                    "total_bytes": volume.total_bytes,
                    "free_bytes": volume.free_bytes,
                    "entries": snapshot.roots.get(&root).map(|state| state.entries.len()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&volumes)?);
        return Ok(());
    }

    println!("{}", "Removable Volumes".bold());
    println!();
    if snapshot.volumes.is_empty() {
        println!("  {}", "None attached".dimmed());
    }
    for volume in &snapshot.volumes {
        let root = RootId::Volume(volume.mount_path.clone());
        let entries = match snapshot.roots.get(&root) {
            Some(state) => format!("{} games", state.entries.len()),
            None => "unreadable".yellow().to_string(),
        };
        println!(
            "  {} {}  {} free of {}  ({})",
            "+".green(),
            volume.mount_path.as_str().cyan(),
            format_bytes(volume.free_bytes),
            format_bytes(volume.total_bytes),
            entries
        );
    }

    if !snapshot.failures.is_empty() {
        println!();
        for failure in &snapshot.failures {
            println!("  {} {}: {}", "!".yellow(), failure.root, failure.error);
        }
    }
    Ok(())
}

/// Human-readable byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use arcade_test_utils::TestLibrary;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(100 * 1024 * 1024), "100.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_volumes_runs() {
        let lib = TestLibrary::new();
        let (service, _) = test_support::service(&lib);
        assert!(run_volumes(&service, false).is_ok());
        assert!(run_volumes(&service, true).is_ok());
    }
}
