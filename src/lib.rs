//! Imovel Core - image resolution and listing normalization for a Sanity
//! backed real-estate catalog.
//!
//! This crate turns loosely shaped CMS property documents into display-ready
//! listings, resolving every image field shape to a usable url and caching
//! processed records with a bounded TTL cache.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing cache, CDN and configuration adapters.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "imovel-core";
