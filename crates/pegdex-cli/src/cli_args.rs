//! CLI argument definitions for the pegdex command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// Pegdex - Game entity and sprite extraction
#[derive(Parser)]
#[command(name = "pegdex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Correlation cache file (default: platform cache directory)
    #[arg(long, global = true)]
    pub cache: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Classify and extract entities from a batch of raw asset records
    Extract {
        /// Path to the batch file (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Sprite catalog file (JSON array of sprites)
        #[arg(long)]
        catalog: Option<String>,

        /// Localization table (flat JSON object of key to text)
        #[arg(short, long)]
        localization: Option<String>,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Do not read or write the correlation cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Manage the correlation cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum CacheCommands {
    /// Delete all cached correlations
    Clear,
    /// Show cache information (entry count, per-method counts)
    Info {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}
