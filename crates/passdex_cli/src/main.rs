//! passdex CLI
//!
//! Ingests password batches into the partitioned index and serves
//! interactive lookups against it.
//!
//! # Commands
//!
//! - `run` - Ingest pending batches, archive them, then serve lookups
//! - `ingest` - Ingest pending batches and archive them
//! - `search` - Serve interactive lookups without ingesting
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// passdex command-line interface.
#[derive(Parser)]
#[command(name = "passdex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store's base directory
    #[arg(global = true, short, long, default_value = ".")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest pending batches, archive them, then serve lookups
    Run,

    /// Ingest pending batches from Unprocessed/ and archive them
    Ingest,

    /// Serve interactive lookups without ingesting
    Search,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run => {
            // A failed ingest phase must not prevent the query loop from
            // starting.
            if let Err(err) = commands::ingest::run(&cli.path) {
                tracing::error!(%err, "ingest phase failed");
            }
            commands::search::run(&cli.path)?;
        }
        Commands::Ingest => {
            commands::ingest::run(&cli.path)?;
        }
        Commands::Search => {
            commands::search::run(&cli.path)?;
        }
        Commands::Version => {
            println!("passdex CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("passdex core v{}", passdex_core::VERSION);
        }
    }

    Ok(())
}
