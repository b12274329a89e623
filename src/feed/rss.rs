//! RSS 2.0 channel assembly.

use super::{FeedMeta, FeedPost};
use crate::{image::ImageUrlBuilder, log, utils::mime};
use regex::Regex;
use rss::{
    Channel, ChannelBuilder, Enclosure, EnclosureBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder,
    extension::{
        atom::{AtomExtension, Link},
        dublincore::DublinCoreExtension,
    },
    validation::Validate,
};
use std::sync::LazyLock;

const GENERATOR: &str = concat!("deskfeed ", env!("CARGO_PKG_VERSION"));
const DOCS: &str = "https://www.rssboard.org/rss-specification";
/// Enclosure byte size. The CDN variant's size is not known without fetching
/// it, and validators reject `0`.
const UNKNOWN_LENGTH: &str = "1";

/// Build the channel for `posts`, one item per validated post.
pub fn build_channel(meta: &FeedMeta, posts: &[FeedPost], images: &ImageUrlBuilder) -> Channel {
    let items: Vec<Item> = posts
        .iter()
        .map(|post| post_to_rss_item(post, meta, images))
        .collect();

    let image = ImageBuilder::default()
        .url(meta.image.clone())
        .title(meta.title.clone())
        .link(meta.link.clone())
        .build();

    ChannelBuilder::default()
        .title(meta.title.clone())
        .link(meta.link.clone())
        .description(meta.description.clone())
        .language(meta.language.clone())
        .copyright(meta.copyright.clone())
        .managing_editor((!meta.managing_editor.is_empty()).then(|| meta.managing_editor.clone()))
        .last_build_date(meta.updated.to_rfc2822())
        .generator(GENERATOR.to_string())
        .docs(DOCS.to_string())
        .image(image)
        .atom_ext(self_link(&meta.feed_link))
        .items(items)
        .build()
}

/// `<atom:link rel="self">` pointing at the feed itself.
fn self_link(href: &str) -> AtomExtension {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("self");
    link.set_mime_type(Some(mime::types::RSS.to_string()));

    let mut atom = AtomExtension::default();
    atom.set_links(vec![link]);
    atom
}

fn post_to_rss_item(post: &FeedPost, meta: &FeedMeta, images: &ImageUrlBuilder) -> Item {
    let enclosure = post
        .image
        .as_ref()
        .and_then(|image| images.url_for(image))
        .and_then(|url| image_enclosure(url, mime::from_image_format(images.format()), &post.slug));

    let (author, dublin_core) = match post.author.as_deref() {
        Some(name) if is_rss_author(name) => (Some(name.to_string()), None),
        Some(name) => {
            let mut dc = DublinCoreExtension::default();
            dc.set_creators(vec![name.to_string()]);
            (None, Some(dc))
        }
        None => (None, None),
    };

    let item = ItemBuilder::default()
        .title(post.title.clone())
        .link(meta.post_link(&post.slug))
        .guid(GuidBuilder::default().permalink(false).value(post.slug.clone()).build())
        .description(post.excerpt.clone())
        .pub_date(post.published_at.to_rfc2822())
        .enclosure(enclosure)
        .author(author)
        .dublin_core_ext(dublin_core)
        .build();

    if let Err(e) = item.validate() {
        log!("warning"; "post '{}' is not a strictly valid RSS item: {e}", post.slug);
    }
    item
}

/// `<enclosure>` for an image URL, or `None` when it would not validate.
fn image_enclosure(url: String, mime_type: &str, slug: &str) -> Option<Enclosure> {
    let enclosure = EnclosureBuilder::default()
        .url(url)
        .length(UNKNOWN_LENGTH.to_string())
        .mime_type(mime_type.to_string())
        .build();

    match enclosure.validate() {
        Ok(()) => Some(enclosure),
        Err(e) => {
            log!("warning"; "post '{slug}': image left out of RSS item: {e}");
            None
        }
    }
}

/// Whether `author` already has the RSS `email (Name)` form.
fn is_rss_author(author: &str) -> bool {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$")
            .expect("author pattern is valid")
    });
    RE_VALID_AUTHOR.is_match(author)
}
