//! Resolution of untrusted CMS image fields into display-ready images.

use serde_json::Value;
use tracing::{trace, warn};

use crate::domain::entities::{Dimensions, Hotspot, ImageShape, ParsedAssetRef, ResolvedImage};
use crate::domain::errors::AssetRefError;
use crate::domain::serde_utils::non_empty_str;
use crate::infrastructure::cdn::{repair_scheme, responsive_set};
use crate::infrastructure::config::SanityConfig;

/// Why a field produced no usable url.
#[derive(Debug)]
enum Unresolved<'a> {
    Missing,
    BadReference {
        reference: &'a str,
        error: AssetRefError,
    },
    AltOnly,
    Unrecognized {
        keys: &'a [&'a str],
    },
}

/// Turns any of the CMS image shapes into a [`ResolvedImage`].
///
/// Resolution never fails: every unusable input degrades to the fallback
/// url and is logged with enough context to trace the CMS document.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    project_id: String,
    dataset: String,
}

impl ImageResolver {
    /// Creates a resolver for a Sanity project and dataset.
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Creates a resolver from configuration.
    #[must_use]
    pub fn from_config(config: &SanityConfig) -> Self {
        Self::new(&config.project_id, &config.dataset)
    }

    /// Resolves an image field, copying hotspot, blur and dominant color
    /// metadata when present.
    #[must_use]
    pub fn resolve(
        &self,
        image: Option<&Value>,
        fallback_url: &str,
        default_alt: &str,
    ) -> ResolvedImage {
        let shape = ImageShape::classify(image);
        let alt = image
            .and_then(|i| non_empty_str(i.get("alt")))
            .unwrap_or(default_alt);

        let resolved = match self.url_for(&shape) {
            Ok((url, dimensions)) => {
                trace!(shape = shape.label(), url = %url, "Resolved image");
                ResolvedImage::new(url, alt).with_dimensions(dimensions)
            }
            Err(reason) => {
                log_unresolved(&reason);
                let alt = if matches!(reason, Unresolved::Unrecognized { .. }) {
                    default_alt
                } else {
                    alt
                };
                ResolvedImage::new(fallback_url, alt)
            }
        };

        match image {
            Some(image) => resolved
                .with_hotspot(image.get("hotspot").and_then(Hotspot::from_value))
                .with_blur_data_url(blur_data_url(image))
                .with_dominant_color(dominant_color(image)),
            None => resolved,
        }
    }

    /// Resolves an image field and attaches small/medium/large/original urls.
    #[must_use]
    pub fn resolve_with_variants(
        &self,
        image: Option<&Value>,
        fallback_url: &str,
        default_alt: &str,
    ) -> ResolvedImage {
        let resolved = self.resolve(image, fallback_url, default_alt);
        let variants = responsive_set(resolved.url());
        resolved.with_responsive(variants)
    }

    /// Url for a shape, plus the pixel size when an asset reference encodes it.
    fn url_for<'a>(
        &self,
        shape: &'a ImageShape<'a>,
    ) -> Result<(String, Option<Dimensions>), Unresolved<'a>> {
        match shape {
            ImageShape::Missing => Err(Unresolved::Missing),
            ImageShape::Direct(url) | ImageShape::Url(url) | ImageShape::LegacyUrl(url) => {
                Ok(((*url).to_string(), None))
            }
            ImageShape::AssetUrl(url) => Ok((repair_scheme(url), None)),
            ImageShape::AssetRef(reference) => reference
                .parse::<ParsedAssetRef>()
                .map(|parsed| {
                    (
                        parsed.to_cdn_url(&self.project_id, &self.dataset),
                        parsed.dimensions(),
                    )
                })
                .map_err(|error| Unresolved::BadReference {
                    reference: *reference,
                    error,
                }),
            ImageShape::AltOnly(_) => Err(Unresolved::AltOnly),
            ImageShape::Unrecognized { keys } => Err(Unresolved::Unrecognized { keys }),
        }
    }
}

fn log_unresolved(reason: &Unresolved<'_>) {
    match reason {
        Unresolved::Missing => warn!("Image field missing, using fallback"),
        Unresolved::BadReference { reference, error } => warn!(
            reference = %reference,
            case = error.case(),
            error = %error,
            "Unusable asset reference, using fallback"
        ),
        Unresolved::AltOnly => warn!("Image has alt text but no source, using fallback"),
        Unresolved::Unrecognized { keys } => warn!(
            keys = ?keys,
            "Unrecognized image shape, using fallback"
        ),
    }
}

fn blur_data_url(image: &Value) -> Option<String> {
    non_empty_str(image.get("lqip"))
        .or_else(|| non_empty_str(image.get("blurDataURL")))
        .or_else(|| non_empty_str(image.pointer("/asset/metadata/lqip")))
        .map(str::to_string)
}

fn dominant_color(image: &Value) -> Option<String> {
    non_empty_str(image.pointer("/asset/metadata/palette/dominant/background"))
        .or_else(|| non_empty_str(image.get("dominantColor")))
        .map(str::to_string)
}
