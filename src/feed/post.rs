//! Content item validation.
//!
//! Items arrive as untyped JSON. Each one either becomes a [`FeedPost`] or is
//! skipped with its reason; one bad item never aborts the pass.

use crate::utils::date::DateTimeUtc;
use serde_json::Value;
use thiserror::Error;

/// Fields every item must carry as strings.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "slug", "excerpt", "publishedAt"];

/// A content item that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub published_at: DateTimeUtc,
    /// Raw `mainImage` value, resolved to a URL at render time.
    pub image: Option<Value>,
    pub author: Option<String>,
}

#[derive(Debug, Error)]
pub enum PostError {
    #[error("item is {0}, not an object")]
    NotAnObject(&'static str),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("publishedAt '{0}' is not a valid date")]
    InvalidDate(String),
}

/// Validate one content item.
pub fn validate_post(item: &Value) -> Result<FeedPost, PostError> {
    let Some(obj) = item.as_object() else {
        return Err(PostError::NotAnObject(crate::content::kind_of(item)));
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !obj.get(*field).is_some_and(Value::is_string))
        .collect();
    if !missing.is_empty() {
        return Err(PostError::MissingFields(missing));
    }

    let text = |field: &str| {
        obj.get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let published = text("publishedAt");
    let published_at =
        DateTimeUtc::parse(&published).ok_or(PostError::InvalidDate(published))?;

    let image = obj.get("mainImage").filter(|v| !v.is_null()).cloned();
    let author = obj
        .get("author")
        .and_then(|a| a.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from);

    Ok(FeedPost {
        title: text("title"),
        slug: text("slug"),
        excerpt: text("excerpt"),
        published_at,
        image,
        author,
    })
}

/// An item dropped during collection.
#[derive(Debug)]
pub struct Skipped {
    pub item: Value,
    pub error: PostError,
}

/// Result of a collection pass.
#[derive(Debug, Default)]
pub struct Collected {
    pub posts: Vec<FeedPost>,
    pub skipped: Vec<Skipped>,
}

/// Validate all items in order, keeping every skipped one with its reason.
pub fn collect_posts(items: Vec<Value>) -> Collected {
    let mut collected = Collected::default();

    for item in items {
        match validate_post(&item) {
            Ok(post) => collected.posts.push(post),
            Err(error) => collected.skipped.push(Skipped { item, error }),
        }
    }

    collected
}
