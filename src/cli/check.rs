//! `deskfeed check`: report posts the feed would leave out.

use crate::{
    config::SiteConfig,
    content::source_from_config,
    feed::render_feed,
    log,
    utils::date::DateTimeUtc,
};
use anyhow::{Context, Result, bail};
use std::net::SocketAddr;

/// Fetch posts and render them without publishing.
///
/// Each skipped post is logged as it is dropped. With `strict`, any skip is
/// an error.
pub fn check_feed(config: &SiteConfig, strict: bool) -> Result<()> {
    let source = source_from_config(config)?;
    log!("check"; "fetching posts from {}", source.describe());

    let items = source
        .fetch_posts()
        .with_context(|| format!("failed to fetch posts from {}", source.describe()))?;
    let total = items.len();

    // links only need to be valid URLs here
    let origin = config.canonical_origin().unwrap_or_else(|_| {
        format!(
            "http://{}",
            SocketAddr::new(config.serve.interface, config.serve.port)
        )
    });
    let feed = render_feed(&origin, items, config, DateTimeUtc::now());

    log!("check"; "{} of {} posts would be published", feed.items, total);

    match feed.skipped {
        0 => Ok(()),
        n if strict => bail!("{n} of {total} posts would be left out of the feed"),
        n => {
            log!("warning"; "{n} of {total} posts would be left out of the feed");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use serde_json::{Value, json};
    use std::fs;

    fn config_with(dir: &tempfile::TempDir, posts: Value) -> SiteConfig {
        let path = dir.path().join("posts.json");
        fs::write(&path, posts.to_string()).unwrap();

        let mut config = SiteConfig::default();
        config.source.kind = SourceKind::File;
        config.source.path = Some(path);
        config
    }

    fn good() -> Value {
        json!({"title": "Hello", "slug": "hello", "excerpt": "World", "publishedAt": "2024-01-01"})
    }

    #[test]
    fn test_check_all_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(&dir, json!([good()]));
        check_feed(&config, true).unwrap();
    }

    #[test]
    fn test_check_skipped_posts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(&dir, json!([good(), {"title": "Draft"}]));

        check_feed(&config, false).unwrap();
        let err = check_feed(&config, true).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 posts would be left out of the feed");
    }

    #[test]
    fn test_check_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with(&dir, json!([]));
        config.source.path = Some(dir.path().join("gone.json"));
        assert!(check_feed(&config, false).is_err());
    }
}
