//! MIME type constants and lookups.
//!
//! Used for HTTP `Content-Type` headers and for the `type` attribute of
//! feed enclosures.

/// Common MIME type constants.
pub mod types {
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const XML: &str = "application/xml";

    // Web feeds
    pub const RSS: &str = "application/rss+xml";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";

    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess MIME type from an image format / file extension string.
pub fn from_image_format(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "pjpg" => types::JPEG,
        "png" => types::PNG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "svg" => types::SVG,
        "ico" => types::ICO,
        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_format() {
        assert_eq!(from_image_format("jpg"), types::JPEG);
        assert_eq!(from_image_format("JPEG"), types::JPEG);
        assert_eq!(from_image_format("pjpg"), types::JPEG);
        assert_eq!(from_image_format("png"), types::PNG);
        assert_eq!(from_image_format("webp"), types::WEBP);
        assert_eq!(from_image_format("xyz"), types::OCTET_STREAM);
    }
}
