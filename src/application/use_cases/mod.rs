//! Use case implementations.

mod process_catalog_use_case;

pub use process_catalog_use_case::{ProcessCatalogUseCase, load_export, parse_export};
