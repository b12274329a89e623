//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::{net::IpAddr, path::PathBuf};

/// Blog RSS feed service
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: deskfeed.toml)
    #[arg(short = 'C', long, global = true, default_value = "deskfeed.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the feed over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        source_args: SourceArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Fixed public origin for feed links instead of the request Host header
        #[arg(long, value_hint = clap::ValueHint::Url)]
        origin: Option<String>,

        /// Number of request worker threads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Render the feed once to a file or stdout
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        source_args: SourceArgs,

        /// Site origin used for absolute links (default: `site.url`)
        #[arg(short = 'U', long, value_hint = clap::ValueHint::Url)]
        origin: Option<String>,

        /// Write the feed to this file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Minify the XML output
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Fetch content and report posts that would be left out of the feed
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        source_args: SourceArgs,

        /// Exit with an error if any post would be skipped
        #[arg(long)]
        strict: bool,
    },
}

/// Content source overrides shared by all subcommands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read posts from a JSON export instead of the configured source
    #[arg(short = 'f', long = "from-file", value_hint = clap::ValueHint::FilePath)]
    pub from_file: Option<PathBuf>,
}

impl Cli {
    /// Source overrides of whichever subcommand was given.
    pub const fn source_args(&self) -> &SourceArgs {
        match &self.command {
            Commands::Serve { source_args, .. }
            | Commands::Build { source_args, .. }
            | Commands::Check { source_args, .. } => source_args,
        }
    }
}
