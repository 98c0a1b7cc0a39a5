//! Display-ready property listing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResolvedImage;

/// Business type of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// For sale.
    Sale,
    /// For rent.
    #[default]
    Rent,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sale => write!(f, "sale"),
            Self::Rent => write!(f, "rent"),
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" | "venda" => Ok(Self::Sale),
            "rent" | "aluguel" | "locacao" => Ok(Self::Rent),
            other => Err(format!("unknown property type: {other}")),
        }
    }
}

/// Which images of a listing get responsive CDN variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    /// No variants.
    #[default]
    Basic,
    /// Variants for the main image.
    Premium,
    /// Variants for the main image and the gallery.
    Enterprise,
}

impl OptimizationLevel {
    /// Returns whether the main image gets responsive variants.
    #[must_use]
    pub const fn main_image_variants(self) -> bool {
        matches!(self, Self::Premium | Self::Enterprise)
    }

    /// Returns whether gallery images get responsive variants.
    #[must_use]
    pub const fn gallery_variants(self) -> bool {
        matches!(self, Self::Enterprise)
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Premium => write!(f, "premium"),
            Self::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// A normalized listing ready for cards, galleries and carousels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ProcessedProperty {
    /// Stable identity (CMS `_id` or generated).
    pub id: String,
    /// Listing title.
    pub title: String,
    /// Url slug.
    pub slug: String,
    /// Neighborhood.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// City.
    pub city: String,
    /// Asking price; `0` when unknown.
    pub price: f64,
    /// Sale or rent.
    pub property_type: PropertyType,
    /// Usable area in square meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Bedroom count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    /// Bathroom count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Parking spot count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_spots: Option<u32>,
    /// Cover image.
    pub main_image: ResolvedImage,
    /// Additional gallery images.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<ResolvedImage>,
    /// Featured on the home page.
    pub is_highlight: bool,
    /// Premium listing.
    pub is_premium: bool,
    /// Published within the freshness window.
    pub is_new: bool,
    /// Publication date, when the CMS supplied a parseable one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Level the record was processed at.
    pub optimization_level: OptimizationLevel,
    /// Set on records served from the property cache.
    pub cache_hit: bool,
}

impl ProcessedProperty {
    /// Returns whether the listing is promoted (highlight or premium).
    #[must_use]
    pub const fn is_promoted(&self) -> bool {
        self.is_highlight || self.is_premium
    }

    /// Returns a copy marked as served from cache.
    #[must_use]
    pub fn as_cache_hit(&self) -> Self {
        Self {
            cache_hit: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("venda", PropertyType::Sale ; "portuguese sale")]
    #[test_case("SALE", PropertyType::Sale ; "uppercase")]
    #[test_case("aluguel", PropertyType::Rent ; "portuguese rent")]
    fn test_property_type_from_str(input: &str, expected: PropertyType) {
        assert_eq!(input.parse::<PropertyType>(), Ok(expected));
    }

    #[test]
    fn test_property_type_rejects_unknown() {
        assert!("permuta".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_optimization_level_capabilities() {
        assert!(!OptimizationLevel::Basic.main_image_variants());
        assert!(OptimizationLevel::Premium.main_image_variants());
        assert!(!OptimizationLevel::Premium.gallery_variants());
        assert!(OptimizationLevel::Enterprise.gallery_variants());
    }

    #[test]
    fn test_optimization_level_serializes_lowercase() {
        let json = serde_json::to_string(&OptimizationLevel::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");
    }
}
