//! Domain types for CMS image fields.

use serde::Serialize;
use serde_json::Value;

use super::Dimensions;
use crate::domain::serde_utils::non_empty_str;

/// Site-relative placeholder used whenever an image cannot be resolved.
pub const PLACEHOLDER_URL: &str = "/images/property-placeholder.jpg";

/// Alt text used when neither the image nor the caller supplies one.
pub const GENERIC_ALT: &str = "Imagem do imóvel";

/// Shape of an untrusted CMS image field, classified once before resolution.
///
/// Variants are listed in resolution precedence: when a value carries several
/// url-bearing fields, the earliest matching variant wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageShape<'a> {
    /// `null`, absent, or a blank string.
    Missing,
    /// A plain url string.
    Direct(&'a str),
    /// Object with a `url` field.
    Url(&'a str),
    /// Object with the legacy `imagemUrl` field.
    LegacyUrl(&'a str),
    /// Object with an expanded `asset.url`.
    AssetUrl(&'a str),
    /// Object with an unexpanded `asset._ref` (possibly blank).
    AssetRef(&'a str),
    /// Object with alt text but nothing to load.
    AltOnly(&'a str),
    /// Anything else; carries the object's own keys for diagnostics.
    Unrecognized {
        /// Keys present on the value (empty for non-objects).
        keys: Vec<&'a str>,
    },
}

impl<'a> ImageShape<'a> {
    /// Classifies a raw CMS image field.
    #[must_use]
    pub fn classify(image: Option<&'a Value>) -> Self {
        let Some(image) = image else {
            return Self::Missing;
        };

        match image {
            Value::Null => Self::Missing,
            Value::String(s) if s.trim().is_empty() => Self::Missing,
            Value::String(s) => Self::Direct(s.as_str()),
            Value::Object(object) => {
                if let Some(url) = non_empty_str(object.get("url")) {
                    return Self::Url(url);
                }
                if let Some(url) = non_empty_str(object.get("imagemUrl")) {
                    return Self::LegacyUrl(url);
                }

                let asset = object.get("asset").and_then(Value::as_object);
                if let Some(url) = non_empty_str(asset.and_then(|a| a.get("url"))) {
                    return Self::AssetUrl(url);
                }
                if let Some(reference) = asset.and_then(|a| a.get("_ref")) {
                    return Self::AssetRef(reference.as_str().unwrap_or_default());
                }

                if let Some(alt) = non_empty_str(object.get("alt")) {
                    return Self::AltOnly(alt);
                }

                Self::Unrecognized {
                    keys: object.keys().map(String::as_str).collect(),
                }
            }
            Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
                Self::Unrecognized { keys: Vec::new() }
            }
        }
    }

    /// Short label of the variant, used as a log field.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Direct(_) => "direct",
            Self::Url(_) => "url",
            Self::LegacyUrl(_) => "imagem_url",
            Self::AssetUrl(_) => "asset_url",
            Self::AssetRef(_) => "asset_ref",
            Self::AltOnly(_) => "alt_only",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// CMS-authored focal point, fractional `0..1` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hotspot {
    /// Horizontal focal point.
    pub x: f64,
    /// Vertical focal point.
    pub y: f64,
}

impl Hotspot {
    /// Reads a hotspot object when both coordinates are numeric.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let x = value.get("x")?.as_f64()?;
        let y = value.get("y")?.as_f64()?;
        Some(Self { x, y })
    }

    /// CSS `object-position` value for this focal point.
    #[must_use]
    pub fn object_position(&self) -> String {
        format!("{}% {}%", self.x * 100.0, self.y * 100.0)
    }
}

/// Breakpoint urls for responsive `srcset` rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsiveSet {
    /// Small screens.
    pub small: String,
    /// Medium screens.
    pub medium: String,
    /// Large screens.
    pub large: String,
    /// Untransformed source.
    pub original: String,
}

/// A display-ready image. `url` and `alt` are never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    url: String,
    alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hotspot: Option<Hotspot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    responsive: Option<ResponsiveSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blur_data_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dominant_color: Option<String>,
}

impl ResolvedImage {
    /// Creates a resolved image, substituting the placeholder and the generic
    /// alt for blank inputs.
    #[must_use]
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        let url = url.into();
        let alt = alt.into();
        Self {
            url: if url.trim().is_empty() {
                PLACEHOLDER_URL.to_string()
            } else {
                url
            },
            alt: if alt.trim().is_empty() {
                GENERIC_ALT.to_string()
            } else {
                alt
            },
            dimensions: None,
            hotspot: None,
            responsive: None,
            blur_data_url: None,
            dominant_color: None,
        }
    }

    /// Creates the terminal fallback image.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_URL, GENERIC_ALT)
    }

    /// Sets the intrinsic pixel size.
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: Option<Dimensions>) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the focal point.
    #[must_use]
    pub fn with_hotspot(mut self, hotspot: Option<Hotspot>) -> Self {
        self.hotspot = hotspot;
        self
    }

    /// Sets the responsive variants.
    #[must_use]
    pub fn with_responsive(mut self, responsive: ResponsiveSet) -> Self {
        self.responsive = Some(responsive);
        self
    }

    /// Sets the low quality placeholder data url.
    #[must_use]
    pub fn with_blur_data_url(mut self, blur: Option<String>) -> Self {
        self.blur_data_url = blur.filter(|b| !b.is_empty());
        self
    }

    /// Sets the dominant background color.
    #[must_use]
    pub fn with_dominant_color(mut self, color: Option<String>) -> Self {
        self.dominant_color = color.filter(|c| !c.is_empty());
        self
    }

    /// Returns the image url.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the alt text.
    #[must_use]
    pub fn alt(&self) -> &str {
        &self.alt
    }

    /// Returns the intrinsic pixel size, when the asset reference encoded it.
    #[must_use]
    pub const fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// Returns the focal point.
    #[must_use]
    pub const fn hotspot(&self) -> Option<Hotspot> {
        self.hotspot
    }

    /// Returns the responsive variants.
    #[must_use]
    pub const fn responsive(&self) -> Option<&ResponsiveSet> {
        self.responsive.as_ref()
    }

    /// Returns the blur placeholder.
    #[must_use]
    pub fn blur_data_url(&self) -> Option<&str> {
        self.blur_data_url.as_deref()
    }

    /// Returns the dominant color.
    #[must_use]
    pub fn dominant_color(&self) -> Option<&str> {
        self.dominant_color.as_deref()
    }

    /// Returns whether this image is the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.url == PLACEHOLDER_URL
    }
}

impl Default for ResolvedImage {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_dimensions_serialized_only_when_known() {
        let plain = serde_json::to_value(ResolvedImage::new("/a.jpg", "A")).unwrap();
        assert!(plain.get("dimensions").is_none());

        let sized = ResolvedImage::new("/a.jpg", "A").with_dimensions(Some(Dimensions {
            width: 800,
            height: 600,
        }));
        let value = serde_json::to_value(&sized).unwrap();
        assert_eq!(value["dimensions"], json!({ "width": 800, "height": 600 }));
    }

    #[test]
    fn test_classify_precedence_prefers_url_over_asset() {
        let image = json!({
            "url": "https://a.com/1.jpg",
            "imagemUrl": "https://a.com/2.jpg",
            "asset": { "_ref": "image-abc-800x600-jpg" }
        });
        assert_eq!(
            ImageShape::classify(Some(&image)),
            ImageShape::Url("https://a.com/1.jpg")
        );
    }

    #[test]
    fn test_classify_legacy_before_asset_url() {
        let image = json!({
            "imagemUrl": "https://a.com/2.jpg",
            "asset": { "url": "https://cdn.sanity.io/x.jpg" }
        });
        assert_eq!(
            ImageShape::classify(Some(&image)),
            ImageShape::LegacyUrl("https://a.com/2.jpg")
        );
    }

    #[test]
    fn test_classify_blank_url_falls_through_to_ref() {
        let image = json!({ "url": "", "asset": { "_ref": "image-abc-png" } });
        assert_eq!(
            ImageShape::classify(Some(&image)),
            ImageShape::AssetRef("image-abc-png")
        );
    }

    #[test]
    fn test_classify_alt_only() {
        let image = json!({ "alt": "Fachada" });
        assert_eq!(
            ImageShape::classify(Some(&image)),
            ImageShape::AltOnly("Fachada")
        );
    }

    #[test]
    fn test_classify_unrecognized_keeps_keys() {
        let image = json!({ "caption": "x", "crop": {} });
        let ImageShape::Unrecognized { mut keys } = ImageShape::classify(Some(&image)) else {
            panic!("expected unrecognized shape");
        };
        keys.sort_unstable();
        assert_eq!(keys, vec!["caption", "crop"]);
    }

    #[test_case(None, "missing" ; "absent")]
    #[test_case(Some(json!(null)), "missing" ; "null")]
    #[test_case(Some(json!("  ")), "missing" ; "blank string")]
    #[test_case(Some(json!("https://a.com/x.png")), "direct" ; "string")]
    #[test_case(Some(json!(42)), "unrecognized" ; "number")]
    #[test_case(Some(json!([])), "unrecognized" ; "array")]
    #[test_case(Some(json!({ "asset": { "_ref": 7 } })), "asset_ref" ; "non string ref")]
    fn test_classify_labels(image: Option<Value>, expected: &str) {
        assert_eq!(ImageShape::classify(image.as_ref()).label(), expected);
    }

    #[test]
    fn test_resolved_image_never_blank() {
        let image = ResolvedImage::new("", " ");
        assert_eq!(image.url(), PLACEHOLDER_URL);
        assert_eq!(image.alt(), GENERIC_ALT);
        assert!(image.is_placeholder());
    }

    #[test]
    fn test_hotspot_requires_numeric_coordinates() {
        assert_eq!(
            Hotspot::from_value(&json!({ "x": 0.25, "y": 0.75 })),
            Some(Hotspot { x: 0.25, y: 0.75 })
        );
        assert_eq!(Hotspot::from_value(&json!({ "x": "0.5", "y": 0.5 })), None);
    }

    #[test]
    fn test_hotspot_object_position() {
        let hotspot = Hotspot { x: 0.5, y: 0.25 };
        assert_eq!(hotspot.object_position(), "50% 25%");
    }
}
