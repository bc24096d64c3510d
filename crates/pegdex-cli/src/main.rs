//! Pegdex CLI - Command-line interface for game entity extraction
//!
//! This binary classifies raw asset records, extracts typed entities, and
//! links them to sprites, keeping a correlation cache between runs.

mod cli_args;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli_args::{CacheCommands, Cli, Commands};
use pegdex_cli::commands;
use pegdex_cli::commands::extract::ExtractOptions;
use pegdex_cli::config::resolve_cache_path;

fn init_logging(verbose: bool) {
    let default = if verbose { "pegdex=debug" } else { "pegdex=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = resolve_cache_path(cli.cache.as_deref()).and_then(|cache_path| match cli.command {
        Commands::Extract {
            input,
            output,
            catalog,
            localization,
            config,
            no_cache,
        } => commands::extract::run(&ExtractOptions {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
            catalog: catalog.map(PathBuf::from),
            localization: localization.map(PathBuf::from),
            config: config.map(PathBuf::from),
            cache_path,
            no_cache,
        }),
        Commands::Cache { command } => match command {
            CacheCommands::Clear => commands::cache::clear(&cache_path),
            CacheCommands::Info { json } => commands::cache::info(&cache_path, json),
        },
    });

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
