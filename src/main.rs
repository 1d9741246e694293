//! Vise - a visual section editor that keeps preview and source in sync.

mod actor;
mod cli;
mod config;
mod core;
mod dom;
mod host;
mod logger;
mod preview;
mod protocol;
mod source;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ViseConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ViseConfig::load(&cli)?;

    match &cli.command {
        Commands::Inspect { args } => cli::inspect::run_inspect(args, &config),
        Commands::Patch { args } => cli::patch::run_patch(args, &config),
        Commands::Session { args } => cli::session::run_session(args, &config),
        Commands::Watch => cli::watch::run_watch(&config),
    }
}
