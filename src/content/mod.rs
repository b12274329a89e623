//! Content sources for feed posts.
//!
//! A source returns the raw post documents exactly as the content backend
//! stores them. Nothing here checks that a post is complete: that is the feed
//! builder's job, so one malformed post never hides the others.
//!
//! | Source          | Backend                                   |
//! |-----------------|-------------------------------------------|
//! | `FileSource`    | JSON export on disk                       |
//! | `SanitySource`  | Sanity HTTP query API (GROQ)              |

mod file;
mod sanity;

pub use file::FileSource;
pub use sanity::SanitySource;

use crate::config::{SiteConfig, SourceKind};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors fetching posts. Any of these fails the whole request.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not valid JSON")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("content API request failed")]
    Http(#[from] reqwest::Error),

    #[error("content API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid content API endpoint: {0}")]
    Endpoint(String),

    #[error("expected a list of posts, got {0}")]
    Shape(&'static str),
}

/// Something that can list the posts for the feed.
pub trait ContentSource: Send + Sync {
    /// Short description for logs (path or endpoint).
    fn describe(&self) -> String;

    /// Fetch every post, in backend order.
    fn fetch_posts(&self) -> Result<Vec<Value>, SourceError>;
}

/// Build the configured content source.
pub fn source_from_config(config: &SiteConfig) -> Result<Box<dyn ContentSource>, SourceError> {
    match config.source.kind {
        SourceKind::File => {
            let path = config
                .source
                .path
                .clone()
                .ok_or_else(|| SourceError::Endpoint("source.path is not set".into()))?;
            Ok(Box::new(FileSource::new(path)))
        }
        SourceKind::Sanity => Ok(Box::new(SanitySource::new(&config.sanity)?)),
    }
}

/// Unwrap a document list: a bare array, or a query response `{"result": [...]}`.
///
/// A `null` result is an empty list (GROQ returns `null` for no match on
/// single-document queries).
pub(crate) fn extract_posts(value: Value) -> Result<Vec<Value>, SourceError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(SourceError::Shape(kind_of(&other))),
            None => Err(SourceError::Shape("an object without `result`")),
        },
        other => Err(SourceError::Shape(kind_of(&other))),
    }
}

pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
