//! Image CDN URL building.
//!
//! Turns a post's `mainImage` into a ready-to-embed transform URL:
//!
//! ```text
//! { asset: { _ref: "image-Tb9Ew8CXIwaY6R1k-2000x3000-jpg" } }
//!   -> https://cdn.sanity.io/images/{project}/{dataset}/Tb9Ew8CXIwaY6R1k-2000x3000.jpg?w=1200&h=800&fm=jpg
//! ```
//!
//! The returned URL keeps raw `&` separators. Escaping to `&amp;` happens
//! once, when the XML writer serializes the enclosure attribute.

use crate::config::SiteConfig;
use serde_json::Value;
use url::Url;

/// Transform parameters this builder owns; stripped from direct URLs before appending.
const OWNED_PARAMS: &[&str] = &["rect", "w", "h", "fm"];

/// A parsed asset reference `image-{id}-{W}x{H}-{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef<'a> {
    pub id: &'a str,
    pub width: u32,
    pub height: u32,
    pub ext: &'a str,
}

/// Parse an asset reference or document id.
pub fn parse_asset_ref(reference: &str) -> Option<AssetRef<'_>> {
    let rest = reference.strip_prefix("image-")?;
    let mut parts = rest.rsplitn(3, '-');
    let ext = parts.next()?;
    let dims = parts.next()?;
    let id = parts.next()?;

    let (w, h) = dims.split_once('x')?;
    let width = w.parse().ok()?;
    let height = h.parse().ok()?;

    if id.is_empty() || ext.is_empty() || width == 0 || height == 0 {
        return None;
    }
    Some(AssetRef {
        id,
        width,
        height,
        ext,
    })
}

/// Source rectangle in pixels, from fractional crop insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl Rect {
    /// `None` when the crop is absent, a no-op, or collapses the image.
    fn from_crop(crop: &Value, width: u32, height: u32) -> Option<Self> {
        let inset = |key: &str| crop.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        let (top, bottom, left, right) = (inset("top"), inset("bottom"), inset("left"), inset("right"));

        if top == 0.0 && bottom == 0.0 && left == 0.0 && right == 0.0 {
            return None;
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let rect_w = (w - (left + right) * w).round();
        let rect_h = (h - (top + bottom) * h).round();
        if rect_w < 1.0 || rect_h < 1.0 {
            return None;
        }

        Some(Self {
            left: (left * w).round().max(0.0) as u32,
            top: (top * h).round().max(0.0) as u32,
            width: rect_w as u32,
            height: rect_h as u32,
        })
    }
}

/// Builds sized, format-converted CDN URLs for image references.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base_url: String,
    project_id: String,
    dataset: String,
    width: u32,
    height: u32,
    format: String,
}

impl ImageUrlBuilder {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            base_url: config.image.base_url.trim_end_matches('/').to_string(),
            project_id: config.sanity.project_id.clone(),
            dataset: config.sanity.dataset.clone(),
            width: config.image.width,
            height: config.image.height,
            format: config.image.format.clone(),
        }
    }

    /// Output format, e.g. `jpg`.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// URL for an image value, or `None` when it holds no usable reference.
    ///
    /// Accepted shapes: `{asset: {_ref}}`, `{asset: {_id}}`, `{asset: {url}}`,
    /// `{asset: "<ref>"}`, or a bare ref/URL string.
    pub fn url_for(&self, image: &Value) -> Option<String> {
        match image {
            Value::String(s) => self.url_for_str(s, None),
            Value::Object(obj) => {
                let crop = obj.get("crop");
                match obj.get("asset")? {
                    Value::String(s) => self.url_for_str(s, crop),
                    Value::Object(asset) => {
                        let reference = asset
                            .get("_ref")
                            .or_else(|| asset.get("_id"))
                            .and_then(Value::as_str);
                        if let Some(url) = reference.and_then(|r| self.url_for_ref(r, crop)) {
                            return Some(url);
                        }
                        let url = asset.get("url").and_then(Value::as_str)?;
                        let dims = asset_dimensions(asset);
                        self.url_for_direct(url, crop, dims)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn url_for_str(&self, s: &str, crop: Option<&Value>) -> Option<String> {
        if s.starts_with("image-") {
            self.url_for_ref(s, crop)
        } else {
            self.url_for_direct(s, crop, None)
        }
    }

    fn url_for_ref(&self, reference: &str, crop: Option<&Value>) -> Option<String> {
        if self.project_id.is_empty() {
            return None;
        }
        let asset = parse_asset_ref(reference)?;
        let rect = crop.and_then(|c| Rect::from_crop(c, asset.width, asset.height));

        Some(format!(
            "{}/images/{}/{}/{}-{}x{}.{}?{}",
            self.base_url,
            self.project_id,
            self.dataset,
            asset.id,
            asset.width,
            asset.height,
            asset.ext,
            self.transform_query(rect)
        ))
    }

    /// Re-parameterize an already-resolved asset URL, keeping foreign query pairs.
    fn url_for_direct(
        &self,
        raw: &str,
        crop: Option<&Value>,
        dims: Option<(u32, u32)>,
    ) -> Option<String> {
        let mut url = Url::parse(raw).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !OWNED_PARAMS.contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let rect = match (crop, dims) {
            (Some(c), Some((w, h))) => Rect::from_crop(c, w, h),
            _ => None,
        };

        let mut query = String::new();
        if !kept.is_empty() {
            query = url::form_urlencoded::Serializer::new(query)
                .extend_pairs(kept)
                .finish();
            query.push('&');
        }
        query.push_str(&self.transform_query(rect));

        // set_query keeps `,` in `rect=` unencoded
        url.set_query(Some(&query));
        Some(url.into())
    }

    fn transform_query(&self, rect: Option<Rect>) -> String {
        let mut query = String::new();
        if let Some(r) = rect {
            query.push_str(&format!(
                "rect={},{},{},{}&",
                r.left, r.top, r.width, r.height
            ));
        }
        query.push_str(&format!(
            "w={}&h={}&fm={}",
            self.width, self.height, self.format
        ));
        query
    }
}

/// Pixel size from an expanded asset document (`metadata.dimensions`).
fn asset_dimensions(asset: &serde_json::Map<String, Value>) -> Option<(u32, u32)> {
    let dims = asset.get("metadata")?.get("dimensions")?;
    let w = u32::try_from(dims.get("width")?.as_u64()?).ok()?;
    let h = u32::try_from(dims.get("height")?.as_u64()?).ok()?;
    Some((w, h))
}
