//! # Metamorph CLI Module
//!
//! This module implements the CLI interface for Metamorph.
//!
//! ## Available Commands
//!
//! - `run` - Start the evolution widget (interactive or `--auto`)
//! - `status` - Show catalog and timing summary
//! - `catalog` - List the stage sequence

mod commands;

use clap::{Parser, Subcommand};
use metamorph_core::MetamorphError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Metamorph - staged-evolution console widget
///
/// Advances a single entity through a fixed ladder of evolution stages,
/// one timed transition per trigger pull.
#[derive(Parser, Debug)]
#[command(name = "metamorph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a stage catalog TOML file (defaults to the built-in ladder)
    #[arg(short = 'C', long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the evolution widget
    Run {
        /// Advance through every remaining stage without waiting for input
        #[arg(short, long)]
        auto: bool,
    },

    /// Show catalog and timing summary
    Status,

    /// List the stage sequence
    Catalog,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MetamorphError> {
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Run { auto }) => cmd_run(catalog, auto).await,
        Some(Commands::Catalog) => cmd_catalog(&catalog, json_mode),
        Some(Commands::Status) | None => {
            // No subcommand - show status by default
            cmd_status(&catalog, json_mode)
        }
    }
}
