//! HTTP response handlers.
//!
//! tiny_http omits the body for `HEAD` requests on its own, so each handler
//! sends the same response for `GET` and `HEAD`.

use crate::{feed::FeedResponse, utils::mime::types::PLAIN};
use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

/// Methods accepted on the feed route.
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// Respond with a rendered feed.
pub fn respond_feed(request: Request, feed: FeedResponse) -> Result<()> {
    let mut response = Response::from_string(feed.body).with_status_code(StatusCode(feed.status));
    for (key, value) in feed.headers {
        response.add_header(make_header(key, value)?);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_plain(request, 404, "404 Not Found", None)
}

/// Respond with 405 Method Not Allowed.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_plain(
        request,
        405,
        "405 Method Not Allowed",
        Some(("Allow", ALLOWED_METHODS)),
    )
}

/// Respond with 500 when the content source failed.
pub fn respond_error(request: Request) -> Result<()> {
    send_plain(request, 500, "500 Internal Server Error", None)
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_plain(request, 503, "503 Service Unavailable", None)
}

fn send_plain(
    request: Request,
    status: u16,
    body: &'static str,
    extra: Option<(&'static str, &'static str)>,
) -> Result<()> {
    let mut response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN)?);
    if let Some((key, value)) = extra {
        response.add_header(make_header(key, value)?);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}
