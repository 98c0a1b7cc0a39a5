//! Domain layer with listing entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Lenient JSON accessors.
pub mod serde_utils;

pub use entities::{ProcessedProperty, ResolvedImage};
pub use errors::{AssetRefError, CatalogError, ProcessingError};
pub use ports::{Clock, PropertyCachePort};
