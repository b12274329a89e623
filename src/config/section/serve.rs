//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 3000                 # HTTP port number
//! route = "/blog/feed.xml"    # Path the feed is served at
//! workers = 4                 # Request worker threads
//! # origin = "https://cyberdesk.io"  # Fixed origin instead of the Host header
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Request path of the feed.
    pub route: String,

    /// Public origin for feed links. When unset, derived from each request.
    pub origin: Option<String>,

    /// Size of the request thread pool.
    pub workers: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            route: "/blog/feed.xml".into(),
            origin: None,
            workers: 4,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.route.starts_with('/') {
            diag.error_with_hint(
                FieldPath::new("serve.route"),
                format!("route '{}' must start with '/'", self.route),
                "use format like /blog/feed.xml",
            );
        }

        if self.workers == 0 {
            diag.error(FieldPath::new("serve.workers"), "need at least one worker");
        }

        if let Some(origin) = &self.origin {
            super::site::validate_origin(FieldPath::new("serve.origin"), origin, diag);
        }
    }
}
