//! deskfeed - serves a blog's RSS 2.0 feed from a headless content source.

mod cli;
mod config;
mod content;
mod core;
mod feed;
mod image;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

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

    let config = init_config(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve_feed(&config),
        Commands::Build { output, .. } => cli::build::build_feed(&config, output.as_deref()),
        Commands::Check { strict, .. } => cli::check::check_feed(&config, *strict),
    }
}
