//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Arcade - browse and launch games from your library and removable media
#[derive(Parser, Debug)]
#[command(name = "arcade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root holding Games/, Emulators/ and Cores/
    #[arg(short, long, global = true, env = "ARCADE_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file (TOML, JSON or YAML); overrides --root
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Only catalog the local library, ignoring removable volumes
    #[arg(long, global = true)]
    pub no_volumes: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every cataloged game with its number
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Launch a game by number
    ///
    /// Examples:
    ///   arcade launch 3                  # Launch entry 3
    ///   arcade launch 3 --generation 7   # Only if the index is still generation 7
    Launch {
        /// Entry number as shown by `arcade list`
        number: usize,

        /// Refuse to launch unless the index has this generation
        #[arg(short, long)]
        generation: Option<u64>,
    },

    /// Show an entry and how it would be launched
    Info {
        /// Entry number as shown by `arcade list`
        number: usize,
    },

    /// Show attached removable volumes
    Volumes {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the launch rules in effect
    Rules,

    /// Show installed programs and runner artifacts
    Programs,

    /// Keep the catalog refreshed and reprint it whenever it changes
    ///
    /// Press Enter to refresh immediately; close stdin (Ctrl-D) to quit.
    Watch,
}
