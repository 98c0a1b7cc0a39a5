//! Sanity image asset reference value object.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::errors::AssetRefError;

/// Host serving Sanity image assets.
pub const SANITY_CDN_HOST: &str = "cdn.sanity.io";

/// Extension used when a reference does not carry a recognizable one.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Extension tokens recognized when scanning a degenerate reference.
pub const KNOWN_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "svg"];

const REF_PREFIX: &str = "image";

static DIMENSIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)$").unwrap());

/// Pixel dimensions encoded in a reference as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Parses a `WxH` segment.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        let caps = DIMENSIONS_RE.captures(segment)?;
        let width = caps.get(1)?.as_str().parse().ok()?;
        let height = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { width, height })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A parsed `image-<id>-<WxH>-<ext>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAssetRef {
    id: String,
    dimensions: Option<Dimensions>,
    extension: String,
}

impl ParsedAssetRef {
    /// Asset id (may contain hyphens for long hashes).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Encoded dimensions, if the reference carried them.
    #[must_use]
    pub const fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// File extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name as served by the CDN: `<id>[-<WxH>].<ext>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self.dimensions {
            Some(dims) => format!("{}-{dims}.{}", self.id, self.extension),
            None => format!("{}.{}", self.id, self.extension),
        }
    }

    /// Absolute CDN url for the given project and dataset.
    #[must_use]
    pub fn to_cdn_url(&self, project_id: &str, dataset: &str) -> String {
        format!(
            "https://{SANITY_CDN_HOST}/images/{project_id}/{dataset}/{}",
            self.file_name()
        )
    }

    fn build(
        id: String,
        dimensions: Option<Dimensions>,
        extension: Option<&str>,
    ) -> Result<Self, AssetRefError> {
        if id.trim().is_empty() {
            return Err(AssetRefError::EmptyId);
        }

        Ok(Self {
            id,
            dimensions,
            extension: normalize_extension(extension),
        })
    }
}

impl FromStr for ParsedAssetRef {
    type Err = AssetRefError;

    fn from_str(reference: &str) -> Result<Self, Self::Err> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(AssetRefError::Empty);
        }

        let parts: Vec<&str> = reference.split('-').collect();
        if parts[0] != REF_PREFIX {
            return Err(AssetRefError::WrongPrefix {
                prefix: parts[0].to_string(),
            });
        }
        if parts.len() < 3 {
            return Err(AssetRefError::Truncated {
                segments: parts.len(),
            });
        }

        if let Some(segment) = parts[2..].iter().find(|segment| {
            DIMENSIONS_RE.is_match(segment) && Dimensions::parse(segment).is_none()
        }) {
            return Err(AssetRefError::DimensionsOutOfRange {
                segment: (*segment).to_string(),
            });
        }

        if parts.len() == 3 {
            // image-<id>-<ext>, or image-<id>-<WxH> with the extension missing
            return match Dimensions::parse(parts[2]) {
                Some(dims) => Self::build(parts[1].to_string(), Some(dims), None),
                None => Self::build(parts[1].to_string(), None, Some(parts[2])),
            };
        }

        if let Some(dims) = Dimensions::parse(parts[2]) {
            return Self::build(parts[1].to_string(), Some(dims), Some(parts[3]));
        }

        if parts.len() > 4
            && let Some((index, dims)) = parts
                .iter()
                .enumerate()
                .skip(3)
                .find_map(|(i, segment)| Dimensions::parse(segment).map(|d| (i, d)))
        {
            let id = parts[1..index].join("-");
            return Self::build(id, Some(dims), parts.get(index + 1).copied());
        }

        let extension = parts[2..]
            .iter()
            .map(|segment| strip_query(segment))
            .find(|segment| is_known_extension(segment));
        Self::build(parts[1].to_string(), None, extension)
    }
}

fn strip_query(segment: &str) -> &str {
    segment.split('?').next().unwrap_or(segment).trim()
}

fn is_known_extension(segment: &str) -> bool {
    KNOWN_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(segment))
}

fn normalize_extension(raw: Option<&str>) -> String {
    raw.map(strip_query)
        .filter(|ext| !ext.is_empty())
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), str::to_ascii_lowercase)
}
