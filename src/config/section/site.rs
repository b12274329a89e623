//! `[site]` section configuration.
//!
//! Static feed metadata. Every field has a default, so an empty config
//! produces the stock blog feed.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "The Cyberdesk Blog"
//! author = "Alan Duong"
//! email = "devs@cyberdesk.io"
//! url = "https://cyberdesk.io"        # origin used by `deskfeed build`
//! copyright = "All rights reserved {year}"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the current year in `copyright`.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Feed metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Channel title.
    pub title: String,

    /// Channel description.
    pub description: String,

    /// Feed author name.
    pub author: String,

    /// Feed author email.
    pub email: String,

    /// Canonical origin (e.g. "https://example.com"), used when there is no request.
    pub url: Option<String>,

    /// Optional `<language>` code (e.g. "en").
    pub language: Option<String>,

    /// Copyright line, `{year}` is replaced at render time.
    pub copyright: String,

    /// Favicon path, joined to the origin for the channel `<image>`.
    pub favicon: String,

    /// Path prefix for post permalinks (`{origin}{post_path}/{slug}`).
    pub post_path: String,

    /// Strip whitespace between XML elements.
    pub minify: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "The Cyberdesk Blog".into(),
            description: "Stay informed with product updates, company news, and insights on how to build world class computer agents.".into(),
            author: "Alan Duong".into(),
            email: "devs@cyberdesk.io".into(),
            url: None,
            language: None,
            copyright: format!("All rights reserved {YEAR_PLACEHOLDER}"),
            favicon: "/favicon.ico".into(),
            post_path: "/blog".into(),
            minify: false,
        }
    }
}

impl SiteSection {
    /// Render the copyright line for `year`.
    pub fn copyright_for(&self, year: u16) -> String {
        self.copyright
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }

    /// Permalink prefix with exactly one leading and no trailing slash.
    pub fn post_prefix(&self) -> String {
        let trimmed = self.post_path.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `title` must not be empty
    /// - `email`, when set, must look like an address
    /// - `url` must be a valid http(s) URL with a host
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error(FieldPath::new("site.title"), "channel title must not be empty");
        }

        if !self.email.is_empty() && !self.email.contains('@') {
            diag.error_with_hint(
                FieldPath::new("site.email"),
                format!("'{}' is not an email address", self.email),
                "use format like devs@example.com",
            );
        }

        if let Some(url_str) = &self.url {
            validate_origin(FieldPath::new("site.url"), url_str, diag);
        }
    }
}

/// Check that `url_str` is an absolute http(s) URL with a host.
pub fn validate_origin(field: FieldPath, url_str: &str, diag: &mut ConfigDiagnostics) {
    match url::Url::parse(url_str) {
        Ok(parsed) => {
            // Must be http or https
            if !matches!(parsed.scheme(), "http" | "https") {
                diag.error_with_hint(
                    field,
                    format!(
                        "scheme '{}' not supported, must be http or https",
                        parsed.scheme()
                    ),
                    "use format like https://example.com",
                );
            }
            // Must have a valid host
            if parsed.host_str().is_none() {
                diag.error_with_hint(
                    field,
                    "URL must have a valid host",
                    "use format like https://example.com",
                );
            }
        }
        Err(e) => {
            diag.error_with_hint(
                field,
                format!("invalid URL: {}", e),
                "use format like https://example.com",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.title, "The Cyberdesk Blog");
        assert_eq!(config.site.author, "Alan Duong");
        assert_eq!(config.site.email, "devs@cyberdesk.io");
        assert_eq!(config.site.post_prefix(), "/blog");
        assert!(!config.site.minify);
    }

    #[test]
    fn test_copyright_for_year() {
        let site = SiteSection::default();
        assert_eq!(site.copyright_for(2025), "All rights reserved 2025");
    }

    #[test]
    fn test_post_prefix_normalized() {
        let mut site = SiteSection::default();
        site.post_path = "posts/".into();
        assert_eq!(site.post_prefix(), "/posts");
        site.post_path = "/".into();
        assert_eq!(site.post_prefix(), "");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut site = SiteSection::default();
        site.url = Some("ftp://example.com".into());
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(diag.has_errors());

        site.url = Some("https://example.com".into());
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let mut site = SiteSection::default();
        site.title = "  ".into();
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
