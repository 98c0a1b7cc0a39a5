use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use imovel_core::application::{
    CatalogRequest, ImageResolver, ProcessCatalogUseCase, PropertyFilter, PropertyProcessor,
    load_export,
};
use imovel_core::domain::Clock;
use imovel_core::infrastructure::{AppConfig, CliArgs, PropertyCache, StorageManager, SystemClock};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

/// Config file, then `NEXT_PUBLIC_SANITY_*` environment, then CLI flags.
fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.sanity.apply_env_overrides();
    config.merge_with_args(args);
    Ok(config)
}

fn filter_from_args(args: &CliArgs) -> PropertyFilter {
    PropertyFilter {
        property_type: args.property_type,
        min_price: args.min_price,
        max_price: args.max_price,
        min_bedrooms: args.min_bedrooms,
        min_area: args.min_area,
        location: args.location.clone(),
        highlight_only: args.highlight_only,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(
        version = imovel_core::VERSION,
        project_id = %config.sanity.project_id,
        dataset = %config.sanity.dataset,
        "Starting {}",
        imovel_core::NAME
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(PropertyCache::from_config(&config.cache, clock.clone()));
    let processor = PropertyProcessor::from_config(
        &config.processor,
        ImageResolver::from_config(&config.sanity),
        cache.clone(),
        clock,
    );
    let use_case = ProcessCatalogUseCase::new(Arc::new(processor));

    let documents = load_export(args.input.as_deref())?;
    debug!(documents = documents.len(), "Loaded catalog export");

    let request = CatalogRequest::new(documents, config.processor.optimization_level)
        .with_filter(filter_from_args(&args))
        .with_sort(args.sort);
    let response = use_case.execute(request);

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    info!(stats = %cache.stats(), "Done");

    Ok(())
}
