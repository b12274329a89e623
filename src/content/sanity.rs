//! Sanity query API source.
//!
//! Issues one GROQ query per fetch:
//!
//! ```text
//! GET https://{project}.apicdn.sanity.io/v{version}/data/query/{dataset}?query=...
//! Authorization: Bearer {token}      (only when a token is configured)
//! ```

use super::{ContentSource, SourceError, extract_posts};
use crate::{config::SanityConfig, debug};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Longest error body kept in `SourceError::Status`.
const MAX_ERROR_BODY: usize = 512;

pub struct SanitySource {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl SanitySource {
    pub fn new(config: &SanityConfig) -> Result<Self, SourceError> {
        let host = if config.use_cdn { "apicdn" } else { "api" };
        let version = config.api_version.trim_start_matches('v');
        let base = format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            config.project_id, host, version, config.dataset
        );
        Self::with_endpoint(&base, &config.query, config)
    }

    /// Point at an explicit query endpoint (used for proxies and tests).
    pub fn with_endpoint(
        base: &str,
        query: &str,
        config: &SanityConfig,
    ) -> Result<Self, SourceError> {
        let mut endpoint =
            Url::parse(base).map_err(|e| SourceError::Endpoint(format!("{base}: {e}")))?;
        endpoint.query_pairs_mut().append_pair("query", query);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("deskfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token: config.resolve_token(),
        })
    }
}

impl ContentSource for SanitySource {
    fn describe(&self) -> String {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.to_string()
    }

    fn fetch_posts(&self) -> Result<Vec<Value>, SourceError> {
        debug!("source"; "GET {}", self.describe());

        let mut request = self.client.get(self.endpoint.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json()?;
        extract_posts(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanityConfig;
    use std::thread;
    use tiny_http::{Header, Response, Server};

    fn test_config() -> SanityConfig {
        SanityConfig {
            project_id: "abc123xy".into(),
            token: None,
            token_env: "DESKFEED_TEST_TOKEN_UNSET".into(),
            ..SanityConfig::default()
        }
    }

    /// Serve one request with `status` and `body`, returning the base URL and
    /// a handle yielding the request's URL and Authorization header.
    fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, thread::JoinHandle<(String, Option<String>)>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            let request = server.recv().unwrap();
            let url = request.url().to_string();
            let auth = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.to_string());
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            request.respond(response).unwrap();
            (url, auth)
        });
        (format!("http://{addr}/v2024-07-25/data/query/production"), handle)
    }

    #[test]
    fn test_endpoint_from_config() {
        let source = SanitySource::new(&test_config()).unwrap();
        assert_eq!(
            source.describe(),
            "https://abc123xy.apicdn.sanity.io/v2024-07-25/data/query/production"
        );
        assert!(source.endpoint.query().unwrap().starts_with("query="));

        let config = SanityConfig {
            use_cdn: false,
            api_version: "v1".into(),
            ..test_config()
        };
        let source = SanitySource::new(&config).unwrap();
        assert_eq!(
            source.describe(),
            "https://abc123xy.api.sanity.io/v1/data/query/production"
        );
    }

    #[test]
    fn test_fetch_posts_over_http() {
        let (base, handle) = serve_once(200, r#"{"ms": 2, "result": [{"title": "Hello"}]}"#);
        let config = SanityConfig {
            token: Some("sk-test".into()),
            ..test_config()
        };
        let source = SanitySource::with_endpoint(&base, "*[_type == \"post\"]", &config).unwrap();

        let posts = source.fetch_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["title"], "Hello");

        let (url, auth) = handle.join().unwrap();
        assert!(url.starts_with("/v2024-07-25/data/query/production?query="));
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    }

    #[test]
    fn test_fetch_posts_error_status() {
        let (base, handle) = serve_once(401, r#"{"error": "Unauthorized"}"#);
        let source = SanitySource::with_endpoint(&base, "*", &test_config()).unwrap();

        match source.fetch_posts() {
            Err(SourceError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Unauthorized"));
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let (_, auth) = handle.join().unwrap();
        assert!(auth.is_none());
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            SanitySource::with_endpoint("not a url", "*", &test_config()),
            Err(SourceError::Endpoint(_))
        ));
    }
}
