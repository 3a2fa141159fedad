//! Arcade CLI
//!
//! Lists the games found in the local library and on removable volumes and
//! launches them by number.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use arcade_core::CatalogService;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} game library launcher", "arcade".green().bold());
        println!();
        println!("Run {} for available commands.", "arcade --help".cyan());
        return Ok(());
    };

    let config = context::resolve_config(cli.root.as_deref(), cli.config.as_deref())?;
    let service = context::build_service(config, cli.no_volumes)?;
    execute_command(&service, command)
}

fn execute_command(service: &CatalogService, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List { json } => {
            service.refresh_now()?;
            commands::run_list(service, json)
        }
        Commands::Launch { number, generation } => {
            service.refresh_now()?;
            commands::run_launch(service, number, generation)
        }
        Commands::Info { number } => {
            service.refresh_now()?;
            commands::run_info(service, number)
        }
        Commands::Volumes { json } => {
            service.refresh_now()?;
            commands::run_volumes(service, json)
        }
        Commands::Rules => commands::run_rules(service),
        Commands::Programs => commands::run_programs(service),
        Commands::Watch => commands::run_watch(service),
    }
}
