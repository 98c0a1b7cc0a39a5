//! In-memory caching of processed listings.

pub mod property_cache;

pub use property_cache::{CacheStats, PropertyCache};
