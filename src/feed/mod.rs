//! Feed builder.
//!
//! Turns fetched content items into an RSS 2.0 document plus the HTTP
//! metadata it is served with. Stateless: everything is rebuilt per call.
//!
//! ```text
//! items ──► collect_posts ──► build_channel ──► serialize ──► FeedResponse
//!              │ (skip + log bad items)
//! ```

mod meta;
mod post;
mod rss;

pub use meta::FeedMeta;
pub use post::{FeedPost, Skipped, collect_posts};
pub use rss::build_channel;

use crate::{
    config::SiteConfig,
    content::{ContentSource, SourceError},
    debug,
    image::ImageUrlBuilder,
    log,
    utils::{date::DateTimeUtc, mime},
};
use ::rss::Channel;
use serde_json::Value;

pub const CONTENT_TYPE: &str = mime::types::XML;

/// Shared caches keep the feed for one (mean Gregorian) year.
pub const CACHE_CONTROL: &str = "s-maxage=31556952";

/// A rendered feed, independent of the HTTP server serving it.
#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String,
    /// Items rendered into the document.
    pub items: usize,
    /// Items left out of the document.
    pub skipped: usize,
}

/// Render the feed document for `origin` from raw content items.
pub fn render_feed(
    origin: &str,
    items: Vec<Value>,
    config: &SiteConfig,
    now: DateTimeUtc,
) -> FeedResponse {
    let meta = FeedMeta::new(origin, config, now);
    let images = ImageUrlBuilder::from_config(config);
    let total = items.len();

    let collected = collect_posts(items);
    for Skipped { item, error } in &collected.skipped {
        log!("skip"; "post left out of RSS feed ({error}): {item}");
    }
    let channel = build_channel(&meta, &collected.posts, &images);
    let rendered = channel.items().len();

    debug!("feed"; "{} of {} items rendered", rendered, total);

    FeedResponse {
        status: 200,
        headers: vec![("Content-Type", CONTENT_TYPE), ("Cache-Control", CACHE_CONTROL)],
        body: serialize(&channel, config.site.minify),
        items: rendered,
        skipped: total - rendered,
    }
}

/// Fetch fresh items from `source` and render them. Fetch failures propagate.
pub fn fetch_and_render(
    source: &dyn ContentSource,
    origin: &str,
    config: &SiteConfig,
) -> Result<FeedResponse, SourceError> {
    let items = source.fetch_posts()?;
    Ok(render_feed(origin, items, config, DateTimeUtc::now()))
}

/// Serialize as indented XML, or on a single line when `minify` is set.
pub fn serialize(channel: &Channel, minify: bool) -> String {
    if minify {
        return channel.to_string();
    }
    channel
        .pretty_write_to(Vec::new(), b' ', 2)
        .ok()
        .and_then(|buf| String::from_utf8(buf).ok())
        .unwrap_or_else(|| channel.to_string())
}
