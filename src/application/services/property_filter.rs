//! Listing criteria applied to processed catalogs.

use crate::domain::entities::{ProcessedProperty, PropertyType};

/// Catalog search criteria. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    /// Sale or rent.
    pub property_type: Option<PropertyType>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Missing bedroom counts count as zero.
    pub min_bedrooms: Option<u32>,
    /// Missing areas count as zero.
    pub min_area: Option<f64>,
    /// Case-insensitive substring of the neighborhood or city.
    pub location: Option<String>,
    /// Keep only highlighted or premium listings.
    pub highlight_only: bool,
}

impl PropertyFilter {
    /// Returns whether no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns whether a listing meets every set criterion.
    #[must_use]
    pub fn matches(&self, property: &ProcessedProperty) -> bool {
        if self
            .property_type
            .is_some_and(|wanted| property.property_type != wanted)
        {
            return false;
        }
        if self.min_price.is_some_and(|min| property.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| property.price > max) {
            return false;
        }
        if self
            .min_bedrooms
            .is_some_and(|min| property.bedrooms.unwrap_or(0) < min)
        {
            return false;
        }
        if self
            .min_area
            .is_some_and(|min| property.area.unwrap_or(0.0) < min)
        {
            return false;
        }
        if self.highlight_only && !property.is_promoted() {
            return false;
        }

        match self.location.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                property
                    .location
                    .iter()
                    .chain(std::iter::once(&property.city))
                    .any(|place| place.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    /// Keeps the matching listings, preserving order.
    #[must_use]
    pub fn apply(&self, properties: Vec<ProcessedProperty>) -> Vec<ProcessedProperty> {
        if self.is_empty() {
            return properties;
        }
        properties.into_iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{OptimizationLevel, ResolvedImage};
    use test_case::test_case;

    fn listing() -> ProcessedProperty {
        ProcessedProperty {
            id: "p1".to_string(),
            title: "Casa".to_string(),
            slug: "p1".to_string(),
            location: Some("Centro".to_string()),
            city: "Guararema".to_string(),
            price: 450_000.0,
            property_type: PropertyType::Sale,
            area: Some(120.0),
            bedrooms: Some(3),
            bathrooms: Some(2),
            parking_spots: None,
            main_image: ResolvedImage::placeholder(),
            gallery: Vec::new(),
            is_highlight: false,
            is_premium: false,
            is_new: false,
            published_at: None,
            optimization_level: OptimizationLevel::Basic,
            cache_hit: false,
        }
    }

    #[test_case(PropertyFilter::default(), true ; "empty filter")]
    #[test_case(PropertyFilter { property_type: Some(PropertyType::Rent), ..Default::default() }, false ; "wrong type")]
    #[test_case(PropertyFilter { min_price: Some(500_000.0), ..Default::default() }, false ; "below min price")]
    #[test_case(PropertyFilter { max_price: Some(450_000.0), ..Default::default() }, true ; "max price inclusive")]
    #[test_case(PropertyFilter { min_bedrooms: Some(3), ..Default::default() }, true ; "enough bedrooms")]
    #[test_case(PropertyFilter { min_area: Some(150.0), ..Default::default() }, false ; "too small")]
    #[test_case(PropertyFilter { location: Some("centro".to_string()), ..Default::default() }, true ; "neighborhood")]
    #[test_case(PropertyFilter { location: Some("GUARA".to_string()), ..Default::default() }, true ; "city")]
    #[test_case(PropertyFilter { location: Some("Mogi".to_string()), ..Default::default() }, false ; "other place")]
    #[test_case(PropertyFilter { highlight_only: true, ..Default::default() }, false ; "not promoted")]
    fn test_matches(filter: PropertyFilter, expected: bool) {
        assert_eq!(filter.matches(&listing()), expected);
    }

    #[test]
    fn test_missing_bedrooms_do_not_match_minimum() {
        let property = ProcessedProperty {
            bedrooms: None,
            ..listing()
        };
        let filter = PropertyFilter {
            min_bedrooms: Some(1),
            ..Default::default()
        };
        assert!(!filter.matches(&property));
    }

    #[test]
    fn test_apply_preserves_order() {
        let cheap = ProcessedProperty {
            id: "cheap".to_string(),
            price: 100.0,
            ..listing()
        };
        let properties = vec![listing(), cheap, listing()];
        let filter = PropertyFilter {
            min_price: Some(1_000.0),
            ..Default::default()
        };

        let kept = filter.apply(properties);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|p| p.id == "p1"));
    }
}
