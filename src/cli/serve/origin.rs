//! Request origin resolution.
//!
//! Feed links are absolute, so every request needs an origin:
//!
//! 1. `serve.origin` when configured (deployments behind a CDN)
//! 2. `X-Forwarded-Proto` + `X-Forwarded-Host`/`Host` from the request
//! 3. the bound socket address

use crate::config::{SiteConfig, url_origin};
use std::net::SocketAddr;
use tiny_http::Request;

/// Origin for absolute links in the response to `request`.
pub fn request_origin(request: &Request, config: &SiteConfig, local: SocketAddr) -> String {
    if let Some(origin) = config.serve.origin.as_deref().and_then(url_origin) {
        return origin;
    }

    let header = |name: &'static str| {
        request
            .headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.as_str())
    };

    origin_from_parts(
        header("X-Forwarded-Proto"),
        header("X-Forwarded-Host").or_else(|| header("Host")),
        local,
    )
}

/// Combine scheme and host headers, falling back to `local` for anything unusable.
pub fn origin_from_parts(proto: Option<&str>, host: Option<&str>, local: SocketAddr) -> String {
    let fallback = || format!("http://{local}");

    // proxies may append: "https, http"
    let scheme = proto
        .and_then(|p| p.split(',').next())
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .filter(|p| p == "http" || p == "https")
        .unwrap_or_else(|| "http".into());

    let host = host
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|h| is_host(h));

    match host {
        Some(host) => url_origin(&format!("{scheme}://{host}")).unwrap_or_else(fallback),
        None => fallback(),
    }
}

fn is_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':' | b'[' | b']'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> SocketAddr {
        "127.0.0.1:3000".parse().unwrap()
    }

    #[test]
    fn test_host_header() {
        assert_eq!(
            origin_from_parts(None, Some("example.com"), local()),
            "http://example.com"
        );
        assert_eq!(
            origin_from_parts(None, Some("localhost:3000"), local()),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_forwarded_proto() {
        assert_eq!(
            origin_from_parts(Some("https"), Some("example.com"), local()),
            "https://example.com"
        );
        assert_eq!(
            origin_from_parts(Some("HTTPS, http"), Some("example.com"), local()),
            "https://example.com"
        );
        // default ports are dropped
        assert_eq!(
            origin_from_parts(Some("https"), Some("example.com:443"), local()),
            "https://example.com"
        );
        assert_eq!(
            origin_from_parts(Some("gopher"), Some("example.com"), local()),
            "http://example.com"
        );
    }

    #[test]
    fn test_fallback_to_local_addr() {
        assert_eq!(origin_from_parts(None, None, local()), "http://127.0.0.1:3000");
        assert_eq!(
            origin_from_parts(None, Some("evil.com/<script>"), local()),
            "http://127.0.0.1:3000"
        );
        assert_eq!(origin_from_parts(None, Some(""), local()), "http://127.0.0.1:3000");
    }
}
