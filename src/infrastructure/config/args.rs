//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use super::app_config::LogLevel;
use crate::application::services::SortOrder;
use crate::domain::entities::{OptimizationLevel, PropertyType};

/// Flags for the catalog binary. Set flags override `config.toml`.
#[derive(Debug, Parser)]
#[command(
    name = "imovel-core",
    version,
    about = "Normalizes a Sanity property export into display-ready listings",
    long_about = None
)]
pub struct CliArgs {
    /// CMS export to read (JSON array or `{ "result": [...] }`). Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Sanity project id.
    #[arg(long)]
    pub project_id: Option<String>,

    /// Sanity dataset.
    #[arg(long)]
    pub dataset: Option<String>,

    /// Image metadata level.
    #[arg(long, value_enum)]
    pub optimization_level: Option<OptimizationLevel>,

    /// Records processed per batch.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Cache time-to-live in seconds.
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Maximum cached records.
    #[arg(long)]
    pub cache_capacity: Option<usize>,

    /// Sort order, e.g. `price-asc`, `date-desc`, `area-desc`, `bedrooms-asc`.
    #[arg(long, value_name = "KEY-DIRECTION")]
    pub sort: Option<SortOrder>,

    /// Keep only sale or rent listings.
    #[arg(long = "type", value_name = "sale|rent")]
    pub property_type: Option<PropertyType>,

    /// Minimum price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum bedroom count.
    #[arg(long)]
    pub min_bedrooms: Option<u32>,

    /// Minimum area in square meters.
    #[arg(long)]
    pub min_area: Option<f64>,

    /// Neighborhood or city substring.
    #[arg(long)]
    pub location: Option<String>,

    /// Keep only highlighted or premium listings.
    #[arg(long)]
    pub highlight_only: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}
