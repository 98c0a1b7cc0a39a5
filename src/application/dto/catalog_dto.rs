//! Catalog processing DTOs.

use serde::Serialize;
use serde_json::Value;

use crate::application::services::{PropertyFilter, SortOrder};
use crate::domain::entities::{OptimizationLevel, ProcessedProperty};

/// Catalog processing request.
#[derive(Debug, Clone)]
pub struct CatalogRequest {
    /// Raw CMS documents.
    pub documents: Vec<Value>,
    /// Image metadata level.
    pub level: OptimizationLevel,
    /// Listing criteria applied after processing.
    pub filter: PropertyFilter,
    /// Order applied after filtering. Input order is kept when unset.
    pub sort: Option<SortOrder>,
}

impl CatalogRequest {
    /// Creates a request that keeps every listing in input order.
    #[must_use]
    pub fn new(documents: Vec<Value>, level: OptimizationLevel) -> Self {
        Self {
            documents,
            level,
            filter: PropertyFilter::default(),
            sort: None,
        }
    }

    /// Sets the listing criteria.
    #[must_use]
    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn with_sort(mut self, sort: Option<SortOrder>) -> Self {
        self.sort = sort;
        self
    }
}

/// Record counts for one catalog run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCounts {
    /// Documents received.
    pub input: usize,
    /// Documents that produced a listing.
    pub processed: usize,
    /// Documents rejected by the processor.
    pub dropped: usize,
    /// Listings excluded by the filter.
    pub filtered_out: usize,
    /// Listings served from the cache.
    pub cache_hits: usize,
}

/// Catalog processing response.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    /// Listings after filtering and sorting.
    pub properties: Vec<ProcessedProperty>,
    /// Record counts.
    pub counts: CatalogCounts,
}
