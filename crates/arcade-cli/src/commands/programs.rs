//! Programs command implementation

use arcade_core::CatalogService;
use colored::Colorize;

use crate::error::Result;

/// Run the programs command
pub fn run_programs(service: &CatalogService) -> Result<()> {
    let installed = service.installed_programs();

    println!("{}", "Programs".bold());
    println!("  {}", installed.programs_dir().display().to_string().dimmed());
    let mut any = false;
    for program in installed.programs() {
        println!("  {} {}", "+".green(), program.cyan());
        any = true;
    }
    if !any {
        println!("  {}", "None installed".dimmed());
    }

    println!();
    println!("{}", "Runner Artifacts".bold());
    println!("  {}", installed.artifacts_dir().display().to_string().dimmed());
    let mut any = false;
    for artifact in installed.artifacts() {
        println!("  {} {}", "+".green(), artifact.cyan());
        any = true;
    }
    if !any {
        println!("  {}", "None installed".dimmed());
    }
    Ok(())
}
