//! `deskfeed build`: render the feed once.

use crate::{
    config::SiteConfig,
    content::{ContentSource, source_from_config},
    debug,
    feed::{FeedResponse, fetch_and_render},
    log,
};
use anyhow::{Context, Result};
use std::{
    fs,
    io::{Write, stdout},
    path::Path,
};

/// Render the feed for `site.url` and write it to `output`, or stdout.
pub fn build_feed(config: &SiteConfig, output: Option<&Path>) -> Result<()> {
    let source = source_from_config(config)?;
    let feed = render_from(source.as_ref(), config)?;

    match output {
        Some(path) => {
            write_feed(path, &feed)?;
            log!(
                "feed";
                "{} ({} items, {} skipped)",
                path.display(),
                feed.items,
                feed.skipped
            );
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(feed.body.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

fn render_from(source: &dyn ContentSource, config: &SiteConfig) -> Result<FeedResponse> {
    let origin = config.canonical_origin()?;
    debug!("source"; "{}", source.describe());

    fetch_and_render(source, &origin, config)
        .with_context(|| format!("failed to fetch posts from {}", source.describe()))
}

fn write_feed(path: &Path, feed: &FeedResponse) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, &feed.body).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use serde_json::json;

    fn file_config(dir: &Path) -> SiteConfig {
        let posts = dir.join("posts.json");
        fs::write(
            &posts,
            json!([
                {"title": "Hello", "slug": "hello", "excerpt": "World", "publishedAt": "2024-01-01"},
                {"slug": "incomplete"}
            ])
            .to_string(),
        )
        .unwrap();

        let mut config = SiteConfig::default();
        config.source.kind = SourceKind::File;
        config.source.path = Some(posts);
        config.site.url = Some("https://example.com".into());
        config
    }

    #[test]
    fn test_build_feed_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(dir.path());
        let output = dir.path().join("public/blog/feed.xml");

        build_feed(&config, Some(&output)).unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<link>https://example.com/blog/hello</link>"));
        assert!(!xml.contains("incomplete"));
    }

    #[test]
    fn test_build_requires_origin() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = file_config(dir.path());
        config.site.url = None;

        let err = build_feed(&config, Some(&dir.path().join("feed.xml"))).unwrap_err();
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn test_build_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = file_config(dir.path());
        config.source.path = Some(dir.path().join("missing.json"));

        let err = build_feed(&config, Some(&dir.path().join("feed.xml"))).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
        assert!(!dir.path().join("feed.xml").exists());
    }
}
