//! Launch command implementation

use arcade_core::{CatalogService, LaunchOutcome};
use colored::Colorize;

use crate::error::{CliError, Result};

/// Run the launch command
pub fn run_launch(service: &CatalogService, number: usize, generation: Option<u64>) -> Result<()> {
    let outcome = match generation {
        Some(generation) => service.resolve_and_launch_in(generation, number),
        None => service.resolve_and_launch(number),
    };

    match outcome {
        LaunchOutcome::Started {
            entry,
            launch,
            receipt,
        } => {
            println!(
                "{} {} with {}",
                "Launched".green().bold(),
                entry.display_name.cyan(),
                launch.label
            );
            println!("  {}", launch.command.dimmed());
            if let Some(pid) = receipt.pid {
                println!("  {}: {}", "pid".dimmed(), pid);
            }
            Ok(())
        }
        LaunchOutcome::ResolutionFailed { entry, failure } => Err(CliError::user(format!(
            "cannot launch {}: {failure}",
            entry.display_name
        ))),
        LaunchOutcome::LaunchFailed {
            entry,
            launch,
            error,
        } => Err(CliError::user(format!(
            "{} could not start {}: {error}",
            launch.label, entry.display_name
        ))),
        LaunchOutcome::UnknownNumber { number, available } => {
            Err(CliError::user(unknown_number_message(number, available)))
        }
        LaunchOutcome::StaleIndex { requested, current } => Err(CliError::user(format!(
            "the catalog changed (generation {requested} is now {current}); run `arcade list` again"
        ))),
    }
}

pub(crate) fn unknown_number_message(number: usize, available: usize) -> String {
    match available {
        0 => format!("no game {number}: the catalog is empty"),
        1 => format!("no game {number}: the only entry is 1"),
        n => format!("no game {number}: choose between 1 and {n}"),
    }
}
