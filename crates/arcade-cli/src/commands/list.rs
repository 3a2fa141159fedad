//! List command implementation

use arcade_catalog::{Index, RootId};
use arcade_core::CatalogService;
use colored::Colorize;
use serde_json::json;

use crate::error::Result;

/// Run the list command
pub fn run_list(service: &CatalogService, json: bool) -> Result<()> {
    let index = service.current_index();

    if json {
        let entries: Vec<_> = index
            .iter()
            .map(|(number, entry)| {
                json!({
                    "number": number,
                    "name": entry.display_name,
                    "system": entry.system,
                    "extension": entry.extension,
                    "path": entry.path.display().to_string(),
                    "source": entry.source.to_string(),
                    "runnable": entry.runnable,
                })
            })
            .collect();
        let output = json!({
            "generation": index.generation(),
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("{}", "No games found".yellow());
        println!();
        println!(
            "Add files to {} or attach a volume.",
            service.config().library_root.display().to_string().cyan()
        );
        return Ok(());
    }

    print_index(&index);
    Ok(())
}

/// Print the index grouped by root.
pub fn print_index(index: &Index) {
    let mut current: Option<&RootId> = None;
    for (number, entry) in index.iter() {
        if current != Some(&entry.source) {
            if current.is_some() {
                println!();
            }
            println!("{}", heading(&entry.source).bold());
            current = Some(&entry.source);
        }
        let marker = if entry.runnable {
            "+".green()
        } else {
            "-".yellow()
        };
        println!(
            "  {} {:>4}  {}  {}",
            marker,
            number,
            entry.display_name.cyan(),
            entry.system.dimmed()
        );
    }
    println!();
    println!(
        "{}: {} entries, generation {}",
        "Index".dimmed(),
        index.len(),
        index.generation()
    );
}

fn heading(root: &RootId) -> String {
    match root {
        RootId::Library => "Library".to_string(),
        RootId::Volume(mount) => format!("Volume {mount}"),
    }
}
