//! `[source]` and `[sanity]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [source]
//! kind = "sanity"             # sanity | file
//! # path = "posts.json"       # required for kind = "file"
//!
//! [sanity]
//! project_id = "abc123xy"
//! dataset = "production"
//! api_version = "2024-07-25"
//! use_cdn = true
//! token_env = "SANITY_API_READ_TOKEN"
//! timeout_secs = 10
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default GROQ query: published posts with the fields the feed needs.
pub const DEFAULT_FEED_QUERY: &str = r#"*[_type == "post" && defined(slug.current)]|order(isFeatured, publishedAt desc){title,"slug": slug.current,publishedAt,mainImage,excerpt,author->{name}}"#;

/// Where posts are fetched from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Sanity HTTP query API (default).
    #[default]
    Sanity,
    /// Local JSON export.
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// JSON export path, resolved relative to the config file.
    pub path: Option<PathBuf>,
}

impl SourceConfig {
    pub fn validate(&self, sanity: &SanityConfig, diag: &mut ConfigDiagnostics) {
        match self.kind {
            SourceKind::File if self.path.is_none() => {
                diag.error_with_hint(
                    FieldPath::new("source.path"),
                    "file source needs a path",
                    "set source.path, e.g.: \"posts.json\"",
                );
            }
            SourceKind::File => {}
            SourceKind::Sanity => sanity.validate(diag),
        }
    }
}

/// Sanity project settings, shared by the query API and the image CDN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Query `apicdn.sanity.io` instead of `api.sanity.io`.
    pub use_cdn: bool,
    /// Read token. Prefer `token_env` to keep secrets out of the file.
    pub token: Option<String>,
    /// Environment variable holding the read token.
    pub token_env: String,
    pub timeout_secs: u64,
    pub query: String,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".into(),
            api_version: "2024-07-25".into(),
            use_cdn: true,
            token: None,
            token_env: "SANITY_API_READ_TOKEN".into(),
            timeout_secs: 10,
            query: DEFAULT_FEED_QUERY.into(),
        }
    }
}

impl SanityConfig {
    /// Token from config, falling back to `token_env`.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.project_id.is_empty() {
            diag.error_with_hint(
                FieldPath::new("sanity.project_id"),
                "sanity source needs a project id",
                "set sanity.project_id, or use [source] kind = \"file\"",
            );
        } else if !is_sanity_name(&self.project_id) {
            diag.error(
                FieldPath::new("sanity.project_id"),
                format!("'{}' is not a valid project id (a-z, 0-9, -)", self.project_id),
            );
        }

        if !is_sanity_name(&self.dataset) {
            diag.error(
                FieldPath::new("sanity.dataset"),
                format!("'{}' is not a valid dataset name", self.dataset),
            );
        }

        let version = self.api_version.trim_start_matches('v');
        if version != "1" && version != "X" && crate::utils::date::DateTimeUtc::parse(version).is_none() {
            diag.error_with_hint(
                FieldPath::new("sanity.api_version"),
                format!("'{}' is not a valid API version", self.api_version),
                "use a date like \"2024-07-25\"",
            );
        }

        if self.timeout_secs == 0 {
            diag.error(FieldPath::new("sanity.timeout_secs"), "timeout must be at least 1 second");
        }
    }
}

/// Project ids and dataset names: lowercase alphanumerics, `-` and `_`.
fn is_sanity_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}
