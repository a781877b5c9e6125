//! SSTable CLI
//!
//! Command-line tools for sstable files.
//!
//! # Commands
//!
//! - `inspect` - Display table statistics and keys
//! - `verify` - Read every value and report damage
//! - `get` - Print one entry

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SSTable command-line tools.
#[derive(Parser)]
#[command(name = "sstable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the table file
    #[arg(global = true, short, long)]
    file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display table statistics
    Inspect {
        /// List every key with its value length
        #[arg(short, long)]
        keys: bool,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Read every value and report truncated or unreadable ones
    Verify,

    /// Print the value length, extra and value of one key
    Get {
        /// Key to look up
        #[arg(short, long)]
        key: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { keys, format } => {
            let path = cli.file.ok_or("--file is required for inspect")?;
            commands::inspect::run(&path, keys, &format)?;
        }
        Commands::Verify => {
            let path = cli.file.ok_or("--file is required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Get { key } => {
            let path = cli.file.ok_or("--file is required for get")?;
            commands::get::run(&path, key.as_bytes())?;
        }
        Commands::Version => {
            println!("sstable CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("sstable core v{}", sstable_core::VERSION);
        }
    }

    Ok(())
}
