//! Channel-level feed metadata.

use crate::{config::SiteConfig, utils::date::DateTimeUtc};

/// Metadata for one feed document, built per invocation.
#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    /// Site origin; used as channel id and link.
    pub link: String,
    /// Feed author in RSS `email (Name)` form, empty when neither is set.
    pub managing_editor: String,
    /// Channel image, the site favicon.
    pub image: String,
    pub copyright: String,
    /// Self-referential feed URL.
    pub feed_link: String,
    pub language: Option<String>,
    /// Permalink prefix, `{origin}{post_path}`.
    pub post_base: String,
    pub updated: DateTimeUtc,
}

impl FeedMeta {
    pub fn new(origin: &str, config: &SiteConfig, now: DateTimeUtc) -> Self {
        let site = &config.site;
        let origin = origin.trim_end_matches('/');

        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            link: origin.to_string(),
            managing_editor: editor(&site.email, &site.author),
            image: join_origin(origin, &site.favicon),
            copyright: site.copyright_for(now.year),
            feed_link: join_origin(origin, &config.serve.route),
            language: site.language.clone(),
            post_base: format!("{origin}{}", site.post_prefix()),
            updated: now,
        }
    }

    /// Absolute permalink for a post slug.
    pub fn post_link(&self, slug: &str) -> String {
        format!("{}/{}", self.post_base, slug)
    }
}

/// Join a path or absolute URL onto the origin.
fn join_origin(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{origin}/{}", path.trim_start_matches('/'))
    }
}

fn editor(email: &str, name: &str) -> String {
    match (email.is_empty(), name.is_empty()) {
        (false, false) => format!("{email} ({name})"),
        (false, true) => email.to_string(),
        _ => String::new(),
    }
}
