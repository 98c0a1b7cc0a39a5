//! Catalog loading error types.

use thiserror::Error;

/// Errors raised while reading a CMS export before any record is processed.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CatalogError {
    #[error("failed to read catalog export: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog export is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog export must be an array or an object with a \"result\" array (found {found})")]
    UnexpectedShape { found: &'static str },
}
