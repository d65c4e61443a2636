//! Taskmaster CLI
//!
//! Command-line tools for a Taskmaster data directory.
//!
//! # Commands
//!
//! - `stats` - Display collection counts
//! - `export` - Write a backup file
//! - `import` - Replace collections from a backup file
//! - `code` - Generate or import a sync code
//! - `sample` - Load the demo data
//! - `theme` - Toggle or set the display theme
//! - `prune` - Remove dangling project references

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Taskmaster data directory tools.
#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(global = true, short, long, default_value = "taskmaster-data")]
    data_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display collection counts
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write a backup file
    Export {
        /// Directory the backup is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Write compact JSON instead of indented JSON
        #[arg(short, long)]
        compact: bool,
    },

    /// Replace every collection with the contents of a backup file
    Import {
        /// Backup file to read
        file: PathBuf,
    },

    /// Generate or import a sync code
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Replace every collection with the demo data
    Sample,

    /// Toggle or set the display theme
    Theme {
        /// Theme to set; toggles when omitted
        #[arg(value_enum, default_value = "toggle")]
        mode: ThemeMode,
    },

    /// Remove project references to missing notes and todos
    Prune {
        /// Dry run - list what would be removed
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum CodeAction {
    /// Print the sync code for the current data
    Generate,

    /// Replace every collection with the contents of a sync code
    Import {
        /// The code, or `-` to read it from stdin
        code: String,
    },
}

/// Theme argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    /// Flip between light and dark
    Toggle,
    /// Light theme
    Light,
    /// Dark theme
    Dark,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("Taskmaster CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Taskmaster Core v{}", taskmaster_core::VERSION);
        println!("Taskmaster Sync v{}", taskmaster_sync::VERSION);
        return Ok(());
    }

    let store = commands::open_store(&cli.data_dir)?;

    match cli.command {
        Commands::Stats { format } => commands::stats::run(&store, &format)?,
        Commands::Export { out, compact } => commands::transfer::export(&store, &out, compact)?,
        Commands::Import { file } => commands::transfer::import_file(&store, &file)?,
        Commands::Code { action } => match action {
            CodeAction::Generate => commands::transfer::generate_code(&store)?,
            CodeAction::Import { code } => {
                let code = commands::transfer::read_code_arg(&code)?;
                commands::transfer::import_code(&store, &code)?;
            }
        },
        Commands::Sample => commands::maintenance::load_sample(&store)?,
        Commands::Theme { mode } => commands::maintenance::theme(&store, mode)?,
        Commands::Prune { dry_run } => commands::maintenance::prune(&store, dry_run)?,
        Commands::Version => {}
    }

    Ok(())
}
