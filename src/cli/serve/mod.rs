//! Feed HTTP server.
//!
//! ```text
//! GET|HEAD {serve.route}  -> 200 feed (fetched fresh per request)
//! other method on route   -> 405, Allow: GET, HEAD
//! anything else           -> 404
//! content source failure  -> 500
//! ```

mod lifecycle;
mod origin;
mod response;

use crate::{
    config::{SiteConfig, cfg},
    content::{ContentSource, source_from_config},
    core::{is_shutdown, register_server},
    debug, feed, log,
};
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tiny_http::{Method, Request, Server};

/// Bind, then serve the feed until Ctrl+C.
pub fn serve_feed(config: &SiteConfig) -> Result<()> {
    let source: Arc<dyn ContentSource> = Arc::from(source_from_config(config)?);
    debug!("source"; "{}", source.describe());

    let bound = bind_server(config)?;
    log!(
        "serve";
        "feed at http://{}{}",
        bound.addr(),
        config.serve.route
    );
    bound.run(source)
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Bind the HTTP server and register it for graceful shutdown.
pub fn bind_server(config: &SiteConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking until the server is unblocked).
    pub fn run(self, source: Arc<dyn ContentSource>) -> Result<()> {
        let workers = cfg().serve.workers;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("deskfeed-worker-{i}"))
            .build()?;

        for request in self.server.incoming_requests() {
            let config = cfg();
            let source = Arc::clone(&source);
            let addr = self.addr;
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &config, source.as_ref(), addr) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(
    request: Request,
    config: &SiteConfig,
    source: &dyn ContentSource,
    local: SocketAddr,
) -> Result<()> {
    // Early exit if shutdown requested
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());

    let path = request.url().split(['?', '#']).next().unwrap_or_default();
    if path != config.serve.route {
        return response::respond_not_found(request);
    }
    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    let origin = origin::request_origin(&request, config, local);
    match feed::fetch_and_render(source, &origin, config) {
        Ok(feed) => response::respond_feed(request, feed),
        Err(e) => {
            log!("error"; "{}: {:#}", source.describe(), anyhow::Error::from(e));
            response::respond_error(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FileSource;
    use serde_json::json;
    use std::{net::Ipv4Addr, thread};

    struct TestServer {
        base: String,
        handle: thread::JoinHandle<()>,
    }

    /// Serve exactly `requests` requests through `handle_request`.
    fn spawn(config: SiteConfig, source: FileSource, requests: usize) -> TestServer {
        let (server, addr) =
            lifecycle::bind_with_retry(Ipv4Addr::LOCALHOST.into(), 0).unwrap();
        let handle = thread::spawn(move || {
            for _ in 0..requests {
                let request = server.recv().unwrap();
                handle_request(request, &config, &source, addr).unwrap();
            }
        });
        TestServer {
            base: format!("http://{addr}"),
            handle,
        }
    }

    fn posts_file(dir: &tempfile::TempDir) -> FileSource {
        let path = dir.path().join("posts.json");
        let posts = json!([
            {"title": "Hello", "slug": "hello", "excerpt": "World", "publishedAt": "2024-01-01T00:00:00Z"},
            {"title": "Broken"}
        ]);
        std::fs::write(&path, posts.to_string()).unwrap();
        FileSource::new(path)
    }

    fn client() -> reqwest::blocking::Client {
        reqwest::blocking::Client::new()
    }

    #[test]
    fn test_get_feed() {
        let dir = tempfile::tempdir().unwrap();
        let server = spawn(SiteConfig::default(), posts_file(&dir), 1);

        let res = client()
            .get(format!("{}/blog/feed.xml", server.base))
            .header("Host", "example.com")
            .header("X-Forwarded-Proto", "https")
            .send()
            .unwrap();

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["content-type"], "application/xml");
        assert_eq!(res.headers()["cache-control"], "s-maxage=31556952");

        let body = res.text().unwrap();
        assert!(body.contains("<link>https://example.com/blog/hello</link>"));
        assert!(!body.contains("Broken"));
        server.handle.join().unwrap();
    }

    #[test]
    fn test_head_and_configured_origin() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.serve.origin = Some("https://cyberdesk.io/".into());
        let server = spawn(config.clone(), posts_file(&dir), 2);

        let res = client()
            .head(format!("{}/blog/feed.xml", server.base))
            .send()
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["content-type"], "application/xml");

        let body = client()
            .get(format!("{}/blog/feed.xml?utm=x", server.base))
            .send()
            .unwrap()
            .text()
            .unwrap();
        assert!(body.contains("<link>https://cyberdesk.io/blog/hello</link>"));
        server.handle.join().unwrap();
    }

    #[test]
    fn test_not_found_and_method_not_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let server = spawn(SiteConfig::default(), posts_file(&dir), 2);

        let res = client().get(format!("{}/feed.xml", server.base)).send().unwrap();
        assert_eq!(res.status().as_u16(), 404);

        let res = client()
            .post(format!("{}/blog/feed.xml", server.base))
            .send()
            .unwrap();
        assert_eq!(res.status().as_u16(), 405);
        assert_eq!(res.headers()["allow"], "GET, HEAD");
        server.handle.join().unwrap();
    }

    #[test]
    fn test_source_failure_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileSource::new(dir.path().join("missing.json"));
        let server = spawn(SiteConfig::default(), missing, 1);

        let res = client()
            .get(format!("{}/blog/feed.xml", server.base))
            .send()
            .unwrap();
        assert_eq!(res.status().as_u16(), 500);
        server.handle.join().unwrap();
    }
}
