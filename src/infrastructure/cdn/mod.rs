//! Sanity image CDN handling.
//!
//! This module provides:
//! - CDN host detection
//! - Width/height/quality url transforms
//! - Responsive breakpoint sets
//! - Scheme repair for asset urls

pub mod sanity_cdn;

pub use sanity_cdn::{
    ImageVariant, default_breakpoints, generate_responsive_urls, is_sanity_cdn_url,
    optimize_cdn_url, repair_scheme, responsive_set,
};
