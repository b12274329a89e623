//! Configuration section definitions.
//!
//! Each module corresponds to a section in `deskfeed.toml`:
//!
//! | Module   | TOML Section           | Purpose                              |
//! |----------|------------------------|--------------------------------------|
//! | `site`   | `[site]`               | Feed metadata (title, author, ...)   |
//! | `source` | `[source]`, `[sanity]` | Where posts come from                |
//! | `image`  | `[image]`              | Enclosure image size and format      |
//! | `serve`  | `[serve]`              | HTTP server                          |

mod image;
mod serve;
mod site;
mod source;

pub use image::ImageConfig;
pub use serve::ServeConfig;
pub use site::SiteSection;
pub use source::{SanityConfig, SourceConfig, SourceKind};
