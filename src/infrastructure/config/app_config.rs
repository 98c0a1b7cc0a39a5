//! Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::args::CliArgs;

use crate::domain::entities::{GENERIC_ALT, OptimizationLevel, PLACEHOLDER_URL};

/// Environment variable holding the Sanity project id.
pub const PROJECT_ID_ENV: &str = "NEXT_PUBLIC_SANITY_PROJECT_ID";

/// Environment variable holding the Sanity dataset.
pub const DATASET_ENV: &str = "NEXT_PUBLIC_SANITY_DATASET";

/// Project id used when neither config nor environment provides one.
pub const DEFAULT_PROJECT_ID: &str = "jgnu3lns";

/// Dataset used when neither config nor environment provides one.
pub const DEFAULT_DATASET: &str = "production";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Sanity project settings.
    #[serde(default)]
    pub sanity: SanityConfig,

    /// Property cache limits.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Property processing settings.
    #[serde(default)]
    pub processor: ProcessorConfig,
}

/// Sanity project used to build CDN urls from asset references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityConfig {
    /// Project id.
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Dataset name.
    #[serde(default = "default_dataset")]
    pub dataset: String,
}

impl SanityConfig {
    /// Applies `NEXT_PUBLIC_SANITY_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable lookup. Blank values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup(PROJECT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.project_id = project_id.trim().to_string();
        }
        if let Some(dataset) = lookup(DATASET_ENV).filter(|v| !v.trim().is_empty()) {
            self.dataset = dataset.trim().to_string();
        }
    }
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            dataset: default_dataset(),
        }
    }
}

/// Property cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live of a record in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of records.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Share of live records dropped when the cache is full.
    #[serde(default = "default_eviction_fraction")]
    pub eviction_fraction: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
            eviction_fraction: default_eviction_fraction(),
        }
    }
}

/// Property processing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Records processed per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Batch runs slower than this are logged, in milliseconds.
    #[serde(default = "default_slow_batch_ms")]
    pub slow_batch_ms: u64,

    /// Image metadata level.
    #[serde(default)]
    pub optimization_level: OptimizationLevel,

    /// Url used when an image cannot be resolved.
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,

    /// Alt text used when a listing has no title.
    #[serde(default = "default_alt")]
    pub default_alt: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            slow_batch_ms: default_slow_batch_ms(),
            optimization_level: OptimizationLevel::default(),
            placeholder_url: default_placeholder_url(),
            default_alt: default_alt(),
        }
    }
}

fn default_project_id() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

const fn default_ttl_secs() -> u64 {
    30 * 60
}

const fn default_capacity() -> usize {
    1000
}

const fn default_eviction_fraction() -> f64 {
    0.2
}

const fn default_batch_size() -> usize {
    50
}

const fn default_slow_batch_ms() -> u64 {
    1000
}

fn default_placeholder_url() -> String {
    PLACEHOLDER_URL.to_string()
}

fn default_alt() -> String {
    GENERIC_ALT.to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(project_id) = &args.project_id {
            self.sanity.project_id.clone_from(project_id);
        }
        if let Some(dataset) = &args.dataset {
            self.sanity.dataset.clone_from(dataset);
        }
        if let Some(level) = args.optimization_level {
            self.processor.optimization_level = level;
        }
        if let Some(batch_size) = args.batch_size {
            self.processor.batch_size = batch_size;
        }
        if let Some(ttl_secs) = args.cache_ttl_secs {
            self.cache.ttl_secs = ttl_secs;
        }
        if let Some(capacity) = args.cache_capacity {
            self.cache.capacity = capacity;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            sanity: SanityConfig::default(),
            cache: CacheConfig::default(),
            processor: ProcessorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [sanity]
            project_id = "abc123"

            [cache]
            capacity = 250

            [processor]
            optimization_level = "enterprise"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.sanity.project_id, "abc123");
        assert_eq!(config.sanity.dataset, DEFAULT_DATASET);
        assert_eq!(config.cache.capacity, 250);
        assert_eq!(config.cache.ttl_secs, 1800);
        assert_eq!(
            config.processor.optimization_level,
            OptimizationLevel::Enterprise
        );
        assert_eq!(config.processor.batch_size, 50);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.sanity.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.processor.placeholder_url, PLACEHOLDER_URL);
        assert_eq!(config.processor.slow_batch_ms, 1000);
    }

    #[test]
    fn test_env_overrides_ignore_blank_values() {
        let mut sanity = SanityConfig::default();
        sanity.apply_env_with(|key| match key {
            PROJECT_ID_ENV => Some(" proj42 ".to_string()),
            DATASET_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(sanity.project_id, "proj42");
        assert_eq!(sanity.dataset, DEFAULT_DATASET);
    }

    #[test]
    fn test_cli_args_override_config() {
        let args = CliArgs::parse_from([
            "imovel-core",
            "--project-id",
            "cli-project",
            "--optimization-level",
            "premium",
            "--cache-capacity",
            "10",
        ]);
        let mut config = AppConfig::default();
        config.merge_with_args(&args);

        assert_eq!(config.sanity.project_id, "cli-project");
        assert_eq!(
            config.processor.optimization_level,
            OptimizationLevel::Premium
        );
        assert_eq!(config.cache.capacity, 10);
        assert_eq!(config.sanity.dataset, DEFAULT_DATASET);
    }
}
