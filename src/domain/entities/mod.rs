//! Domain entity definitions.

mod asset_ref;
mod image;
mod property;

pub use asset_ref::{
    DEFAULT_EXTENSION, Dimensions, KNOWN_EXTENSIONS, ParsedAssetRef, SANITY_CDN_HOST,
};
pub use image::{GENERIC_ALT, Hotspot, ImageShape, PLACEHOLDER_URL, ResolvedImage, ResponsiveSet};
pub use property::{OptimizationLevel, ProcessedProperty, PropertyType};
