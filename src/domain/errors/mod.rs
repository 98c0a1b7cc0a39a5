//! Domain error types.

mod asset_ref_error;
mod catalog_error;
mod processing_error;

pub use asset_ref_error::AssetRefError;
pub use catalog_error::CatalogError;
pub use processing_error::{ProcessingError, json_kind};
