//! Sanity CDN url helpers.

use std::collections::BTreeMap;

use crate::domain::entities::{ResponsiveSet, SANITY_CDN_HOST};

/// Default quality for transformed variants.
pub const DEFAULT_QUALITY: u8 = 80;

/// Width of the `small` breakpoint.
pub const SMALL_WIDTH: u32 = 400;

/// Width of the `medium` breakpoint.
pub const MEDIUM_WIDTH: u32 = 800;

/// Width of the `large` breakpoint.
pub const LARGE_WIDTH: u32 = 1200;

/// Query keys this module owns when transforming a url.
const TRANSFORM_KEYS: [&str; 9] = [
    "w", "h", "q", "auto", "fm", "fit", "width", "height", "quality",
];

/// Target size and quality for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageVariant {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels; keeps aspect ratio when absent.
    pub height: Option<u32>,
    /// JPEG/WebP quality `1..=100`.
    pub quality: Option<u8>,
}

impl ImageVariant {
    /// Creates a width-only variant at default quality.
    #[must_use]
    pub const fn width(width: u32) -> Self {
        Self {
            width,
            height: None,
            quality: Some(DEFAULT_QUALITY),
        }
    }
}

/// Checks if a url is served by the Sanity image CDN.
#[must_use]
pub fn is_sanity_cdn_url(url: &str) -> bool {
    url.contains(SANITY_CDN_HOST)
}

/// Adds width, height, quality and format parameters to a Sanity CDN url.
///
/// Non-CDN urls cannot be transformed and are returned unchanged.
#[must_use]
pub fn optimize_cdn_url(url: &str, variant: &ImageVariant) -> String {
    if !is_sanity_cdn_url(url) {
        return url.to_string();
    }

    let (base_url, existing_params) = match url.split_once('?') {
        Some((base, params)) => (base, Some(params)),
        None => (url, None),
    };

    let mut params = vec![format!("w={}", variant.width)];
    if let Some(height) = variant.height {
        params.push(format!("h={height}"));
    }
    if let Some(quality) = variant.quality {
        params.push(format!("q={quality}"));
    }
    params.push("auto=format".to_string());

    if let Some(existing) = existing_params {
        for param in existing.split('&').filter(|p| !p.is_empty()) {
            let key = param.split('=').next().unwrap_or("");
            if !TRANSFORM_KEYS.contains(&key) {
                params.push(param.to_string());
            }
        }
    }

    format!("{}?{}", base_url, params.join("&"))
}

/// Builds one url per breakpoint.
///
/// A non-CDN base yields the same url for every breakpoint.
#[must_use]
pub fn generate_responsive_urls(
    base_url: &str,
    breakpoints: &BTreeMap<String, ImageVariant>,
) -> BTreeMap<String, String> {
    breakpoints
        .iter()
        .map(|(name, variant)| (name.clone(), optimize_cdn_url(base_url, variant)))
        .collect()
}

/// The breakpoints used for listing cards and galleries.
#[must_use]
pub fn default_breakpoints() -> BTreeMap<String, ImageVariant> {
    BTreeMap::from([
        ("small".to_string(), ImageVariant::width(SMALL_WIDTH)),
        ("medium".to_string(), ImageVariant::width(MEDIUM_WIDTH)),
        ("large".to_string(), ImageVariant::width(LARGE_WIDTH)),
    ])
}

/// Builds the standard small/medium/large/original set for a url.
#[must_use]
pub fn responsive_set(base_url: &str) -> ResponsiveSet {
    let mut urls = generate_responsive_urls(base_url, &default_breakpoints());
    let mut take = |name: &str| urls.remove(name).unwrap_or_else(|| base_url.to_string());

    ResponsiveSet {
        small: take("small"),
        medium: take("medium"),
        large: take("large"),
        original: base_url.to_string(),
    }
}

/// Gives a scheme to an asset url that lacks one.
///
/// Protocol-relative urls get `https:`, bare hosts get `https://`, and
/// site-relative paths are left alone.
#[must_use]
pub fn repair_scheme(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        url.to_string()
    } else if url.starts_with("//") {
        format!("https:{url}")
    } else if url.starts_with('/') {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
