//! `[image]` section configuration.
//!
//! ```toml
//! [image]
//! base_url = "https://cdn.sanity.io"
//! width = 1200
//! height = 800
//! format = "jpg"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Output formats the image CDN can transcode to.
const SUPPORTED_FORMATS: &[&str] = &["jpg", "pjpg", "png", "webp"];

/// Enclosure image transform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub base_url: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cdn.sanity.io".into(),
            width: 1200,
            height: 800,
            format: "jpg".into(),
        }
    }
}

impl ImageConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.width == 0 || self.height == 0 {
            diag.error(
                FieldPath::new("image.width"),
                format!("image size {}x{} must be non-zero", self.width, self.height),
            );
        }

        if !SUPPORTED_FORMATS.contains(&self.format.as_str()) {
            diag.error_with_hint(
                FieldPath::new("image.format"),
                format!("unsupported image format '{}'", self.format),
                format!("use one of: {}", SUPPORTED_FORMATS.join(", ")),
            );
        }

        super::site::validate_origin(
            FieldPath::new("image.base_url"),
            &self.base_url,
            diag,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.image.width, 1200);
        assert_eq!(config.image.height, 800);
        assert_eq!(config.image.format, "jpg");
    }

    #[test]
    fn test_validate() {
        let mut diag = ConfigDiagnostics::new();
        ImageConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());

        let image = ImageConfig {
            width: 0,
            format: "bmp".into(),
            ..ImageConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        image.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
