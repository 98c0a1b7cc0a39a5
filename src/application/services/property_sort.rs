//! Listing order for catalog pages.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::ProcessedProperty;

/// Field a catalog is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Asking price.
    Price,
    /// Freshness and promotion priority.
    Date,
    /// Usable area.
    Area,
    /// Bedroom count.
    Bedrooms,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// A key and direction, parsed from strings such as `price-asc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    /// Field to sort by.
    pub key: SortKey,
    /// Direction.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Creates a sort order.
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Sorts `properties` in place.
    pub fn apply(self, properties: &mut [ProcessedProperty]) {
        sort_properties(properties, self.key, self.direction);
    }
}

impl FromStr for SortOrder {
    type Err = String;

    /// Accepts `<key>` or `<key>-<direction>`. Without a direction, dates
    /// sort descending and everything else ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let (key, direction) = match normalized.split_once('-') {
            Some((key, direction)) => (key, Some(direction)),
            None => (normalized.as_str(), None),
        };

        let key = match key {
            "price" | "preco" => SortKey::Price,
            "date" | "data" | "newest" => SortKey::Date,
            "area" => SortKey::Area,
            "bedrooms" | "quartos" => SortKey::Bedrooms,
            other => return Err(format!("unknown sort key: {other}")),
        };

        let direction = match direction {
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => return Err(format!("unknown sort direction: {other}")),
            None if key == SortKey::Date => SortDirection::Desc,
            None => SortDirection::Asc,
        };

        Ok(Self { key, direction })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            SortKey::Price => "price",
            SortKey::Date => "date",
            SortKey::Area => "area",
            SortKey::Bedrooms => "bedrooms",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{key}-{direction}")
    }
}

/// Sorts listings in place. The sort is stable: equal listings keep their
/// input order in both directions.
///
/// `Date` ranks new listings above old ones and promoted listings above the
/// rest; descending puts the highest priority first.
pub fn sort_properties(properties: &mut [ProcessedProperty], key: SortKey, direction: SortDirection) {
    properties.sort_by(|a, b| direction.apply(compare(a, b, key)));
}

fn compare(a: &ProcessedProperty, b: &ProcessedProperty, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::Area => a.area.unwrap_or(0.0).total_cmp(&b.area.unwrap_or(0.0)),
        SortKey::Bedrooms => a.bedrooms.unwrap_or(0).cmp(&b.bedrooms.unwrap_or(0)),
        SortKey::Date => priority(a).cmp(&priority(b)),
    }
}

const fn priority(property: &ProcessedProperty) -> (bool, bool) {
    (property.is_new, property.is_promoted())
}
