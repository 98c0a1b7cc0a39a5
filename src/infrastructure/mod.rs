//! Infrastructure layer with adapters for caching, time, CDN urls and configuration.

/// Property caching.
pub mod cache;
/// Sanity CDN url helpers.
pub mod cdn;
/// System clock.
pub mod clock;
/// Application configuration.
pub mod config;

pub use cache::{CacheStats, PropertyCache};
pub use cdn::{ImageVariant, is_sanity_cdn_url, optimize_cdn_url, responsive_set};
pub use clock::SystemClock;
pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
