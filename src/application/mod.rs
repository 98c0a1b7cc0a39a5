//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Image and property services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{CatalogCounts, CatalogRequest, CatalogResponse};
pub use services::{ImageResolver, PropertyFilter, PropertyProcessor, SortOrder};
pub use use_cases::{ProcessCatalogUseCase, load_export, parse_export};
