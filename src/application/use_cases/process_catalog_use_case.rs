//! Catalog processing use case.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::application::dto::{CatalogCounts, CatalogRequest, CatalogResponse};
use crate::application::services::PropertyProcessor;
use crate::domain::errors::{CatalogError, json_kind};

/// Turns a CMS export into a filtered, ordered listing page.
#[derive(Clone)]
pub struct ProcessCatalogUseCase {
    processor: Arc<PropertyProcessor>,
}

impl ProcessCatalogUseCase {
    /// Creates new catalog use case.
    #[must_use]
    pub const fn new(processor: Arc<PropertyProcessor>) -> Self {
        Self { processor }
    }

    /// Processes every document, then filters and sorts the listings.
    ///
    /// Rejected documents are dropped and counted, never fatal.
    #[must_use]
    pub fn execute(&self, request: CatalogRequest) -> CatalogResponse {
        let CatalogRequest {
            documents,
            level,
            filter,
            sort,
        } = request;

        debug!(documents = documents.len(), level = %level, "Processing catalog");

        let processed = self.processor.process_many(&documents, level);
        let processed_count = processed.len();
        let cache_hits = processed.iter().filter(|p| p.cache_hit).count();

        let mut properties = filter.apply(processed);
        if let Some(order) = sort {
            order.apply(&mut properties);
        }

        let counts = CatalogCounts {
            input: documents.len(),
            processed: processed_count,
            dropped: documents.len() - processed_count,
            filtered_out: processed_count - properties.len(),
            cache_hits,
        };

        info!(
            input = counts.input,
            processed = counts.processed,
            dropped = counts.dropped,
            filtered_out = counts.filtered_out,
            cache_hits = counts.cache_hits,
            "Catalog processed"
        );

        CatalogResponse { properties, counts }
    }
}

/// Extracts the document list from a CMS export: either a bare array or a
/// query response object with a `result` array.
///
/// # Errors
///
/// Returns `CatalogError` when the text is not JSON or has another shape.
pub fn parse_export(text: &str) -> Result<Vec<Value>, CatalogError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(documents) => Ok(documents),
        Value::Object(mut object) => match object.remove("result") {
            Some(Value::Array(documents)) => Ok(documents),
            Some(other) => Err(CatalogError::UnexpectedShape {
                found: json_kind(&other),
            }),
            None => Err(CatalogError::UnexpectedShape { found: "object" }),
        },
        other => Err(CatalogError::UnexpectedShape {
            found: json_kind(&other),
        }),
    }
}

/// Reads and parses an export from `path`, or from stdin when `path` is
/// absent or `-`.
///
/// # Errors
///
/// Returns `CatalogError::Io` when the source cannot be read, otherwise as
/// [`parse_export`].
pub fn load_export(path: Option<&Path>) -> Result<Vec<Value>, CatalogError> {
    let text = match path {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "Reading catalog export");
            std::fs::read_to_string(path)?
        }
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    parse_export(&text)
}
