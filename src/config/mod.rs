//! Configuration management for `deskfeed.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── image      # [image]
//! │   ├── serve      # [serve]
//! │   ├── site       # [site]
//! │   └── source     # [source], [sanity]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[site]`    | Feed metadata (title, author, copyright)       |
//! | `[source]`  | Content source kind and JSON export path       |
//! | `[sanity]`  | Sanity project for the query API and image CDN |
//! | `[image]`   | Enclosure image size and format                |
//! | `[serve]`   | HTTP server (interface, port, route)           |
//!
//! A missing config file is not an error: every section has defaults, and
//! the CLI can point the source at a JSON export with `--from-file`.

mod section;
pub mod types;
mod util;

pub use util::url_origin;
use util::find_config_file;

// Re-export from section/
pub use section::{ImageConfig, SanityConfig, ServeConfig, SiteSection, SourceConfig, SourceKind};

// Re-export from types/
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    debug, log,
    utils::path::{normalize_path, resolve_config_path},
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing deskfeed.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Feed metadata
    #[serde(default)]
    pub site: SiteSection,

    /// Content source selection
    #[serde(default)]
    pub source: SourceConfig,

    /// Sanity project settings
    #[serde(default)]
    pub sanity: SanityConfig,

    /// Enclosure image settings
    #[serde(default)]
    pub image: ImageConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The root used for
    /// relative paths is the config file's parent directory (cwd if absent).
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve config file path, reporting whether it exists.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.set_root(&normalize_path(&root));
        self.normalize_paths();
        self.apply_command_options(cli);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Parse)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Some(file) = &cli.source_args().from_file {
            // CLI paths are relative to cwd, not to the config file
            self.source.kind = SourceKind::File;
            self.source.path = Some(normalize_path(file));
        }

        match &cli.command {
            Commands::Serve {
                interface,
                port,
                origin,
                workers,
                ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.workers, workers.as_ref());
                if origin.is_some() {
                    self.serve.origin.clone_from(origin);
                }
            }
            Commands::Build { origin, minify, .. } => {
                Self::update_option(&mut self.site.minify, minify.as_ref());
                if origin.is_some() {
                    self.site.url.clone_from(origin);
                }
            }
            Commands::Check { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve file paths from the config relative to the config's directory.
    fn normalize_paths(&mut self) {
        if let Some(path) = self.source.path.take() {
            self.source.path = Some(resolve_config_path(&path, &self.root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.source.validate(&self.sanity, &mut diag);
        self.image.validate(&mut diag);
        self.serve.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Invalid(e).into())
    }

    /// Canonical origin for commands that have no request to derive it from.
    pub fn canonical_origin(&self) -> Result<String> {
        let Some(url) = self.site.url.as_deref() else {
            bail!(ConfigError::NoOrigin);
        };
        url_origin(url)
            .ok_or_else(|| ConfigError::InvalidOrigin(url.to_string()).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
