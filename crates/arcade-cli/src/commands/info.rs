//! Info command implementation

use arcade_core::CatalogService;
use arcade_launch::LaunchKind;
use colored::Colorize;

use crate::commands::launch::unknown_number_message;
use crate::error::{CliError, Result};

/// Run the info command
pub fn run_info(service: &CatalogService, number: usize) -> Result<()> {
    let Some(description) = service.describe(number) else {
        let available = service.current_index().len();
        return Err(CliError::user(unknown_number_message(number, available)));
    };
    let entry = &description.entry;

    println!("{}", entry.display_name.bold());
    println!();
    println!("{}:     {}", "Number".dimmed(), description.number);
    println!("{}:     {}", "System".dimmed(), entry.system.cyan());
    println!("{}:       {}", "File".dimmed(), entry.path.display());
    println!("{}:     {}", "Source".dimmed(), entry.source);
    println!("{}: {}", "Generation".dimmed(), description.generation);

    if let Some(rule) = &description.rule {
        println!();
        println!("{}:", "Rule".bold());
        println!("  {}: .{}", "Extension".dimmed(), rule.extension);
        if let Some(program) = &rule.program {
            println!("  {}:   {} ({})", "Program".dimmed(), rule.label, program);
        }
        if let Some(link) = &rule.runner {
            println!("  {}:    {} + {}", "Runner".dimmed(), link.runner, link.artifact);
        }
        if rule.self_executing {
            println!("  {}:   runs directly", "Program".dimmed());
        }
        if let Some(notes) = &rule.notes {
            println!("  {}:     {}", "Notes".dimmed(), notes);
        }
    }

    println!();
    match &description.resolution {
        Ok(launch) => {
            let via = match launch.kind {
                LaunchKind::Primary => "primary program",
                LaunchKind::SecondaryRunner => "secondary runner",
                LaunchKind::SelfExecuting => "self-executing",
            };
            println!("{}: {} ({})", "Launcher".bold(), launch.label.green(), via);
            println!("  {}", launch.command.dimmed());
        }
        Err(failure) => {
            println!("{}: {}", "Launcher".bold(), failure.to_string().yellow());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use arcade_test_utils::TestLibrary;

    #[test]
    fn test_info_runs_with_and_without_launcher() {
        let lib = TestLibrary::new();
        lib.add_game("a.nes");
        lib.add_game("b.smc");
        lib.install_program("snes9x");
        let (service, launcher) = test_support::service(&lib);

        assert!(run_info(&service, 1).is_ok());
        assert!(run_info(&service, 2).is_ok());
        assert!(launcher.launches().is_empty());
    }

    #[test]
    fn test_info_unknown_number() {
        let lib = TestLibrary::new();
        let (service, _) = test_support::service(&lib);
        let err = run_info(&service, 1).unwrap_err();
        assert!(err.to_string().contains("catalog is empty"));
    }
}
