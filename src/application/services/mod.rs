//! Application services for image resolution and property normalization.

pub mod image_resolver;
pub mod property_filter;
pub mod property_processor;
pub mod property_sort;

pub use image_resolver::ImageResolver;
pub use property_filter::PropertyFilter;
pub use property_processor::{
    DEFAULT_BATCH_SIZE, DEFAULT_SLOW_THRESHOLD, FRESHNESS_DAYS, PropertyProcessor, slugify,
};
pub use property_sort::{SortDirection, SortKey, SortOrder, sort_properties};
