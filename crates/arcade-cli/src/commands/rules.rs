//! Rules command implementation

use arcade_core::CatalogService;
use colored::Colorize;

use crate::error::Result;

/// Run the rules command
pub fn run_rules(service: &CatalogService) -> Result<()> {
    let rules = service.rules();

    println!("{}", "Launch Rules".bold());
    println!();
    for rule in rules.rules() {
        let mut launchers = Vec::new();
        if let Some(program) = &rule.program {
            launchers.push(format!("{} ({program})", rule.label));
        }
        if let Some(link) = &rule.runner {
            launchers.push(format!("{} + {}", link.runner, link.artifact));
        }
        if rule.self_executing {
            launchers.push("self".to_string());
        }
        println!(
            "  {} {:<32} {}",
            format!("{:<6}", format!(".{}", rule.extension)).cyan(),
            rule.system,
            launchers.join(", ").dimmed()
        );
    }

    println!();
    println!("{}", "Secondary Runners".bold());
    println!();
    for runner in rules.runners() {
        println!(
            "  {} {} ({})  {}",
            "+".green(),
            runner.id.cyan(),
            runner.program,
            runner.template.as_str().dimmed()
        );
    }

    let report = service.rule_report();
    if !report.errors.is_empty() {
        println!();
        println!(
            "{} {} excluded from {}:",
            "Warning:".yellow().bold(),
            report.errors.len(),
            report.source.display()
        );
        for error in &report.errors {
            println!("  {} {}", "-".yellow(), error);
        }
    }
    Ok(())
}
