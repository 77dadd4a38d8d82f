use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use tripwise::{BackendClient, GoogleMapsClient, TravelPlanner, TripwiseConfig, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TripwiseConfig::load().context("Failed to load configuration")?;
    tripwise::logging::init(&config.logging)?;
    info!("Starting Tripwise v{}", VERSION);

    let backend = Arc::new(BackendClient::new(&config.backend)?);
    let maps = Arc::new(GoogleMapsClient::new(&config.maps).context(
        "A Google Maps API key is required (maps.api_key or TRIPWISE_MAPS__API_KEY)",
    )?);
    let planner = Arc::new(TravelPlanner::with_backend_translator(backend, maps, &config));

    info!(
        "Using backend {} with default language {}",
        config.backend.base_url, config.language.default
    );
    tripwise::web::run(planner, &config.web).await?;
    Ok(())
}
