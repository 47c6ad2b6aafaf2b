use std::sync::Arc;

use anyhow::Context;
use survey::{CatalogConfig, RestCatalog};
use survey_server::ServerConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let catalog_config = CatalogConfig::from_env().context("Catalog misconfigured")?;
    info!(?catalog_config, "Initializing catalog...");
    let catalog = RestCatalog::new(catalog_config).context("Failed to build catalog client")?;

    let config = ServerConfig::from_env();
    survey_server::run(config, Arc::new(catalog)).await
}
