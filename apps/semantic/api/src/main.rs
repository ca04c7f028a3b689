use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_vector::{OpenAIProvider, VearchClient, VectorApiDoc, VectorService, handlers};
use std::sync::Arc;
use tracing::info;

mod config;
mod health;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Console plus file logging; the guard flushes the file on exit
    let _log_guard = init_tracing(&config.environment, Some(&config.log_file));

    info!(
        model = %config.encoder.model,
        dimension = config.encoder.dimension,
        "Using encoder at {}",
        config.encoder.base_url
    );
    let encoder = Arc::new(OpenAIProvider::new(config.encoder.clone()));

    info!(
        db = %config.vearch.db_name,
        "Connecting to Vearch master {}",
        config.vearch.master_url
    );
    let client = VearchClient::connect(config.vearch.clone())
        .await
        .map_err(|e| eyre::eyre!("Vearch bootstrap failed: {}", e))?;

    let service = Arc::new(VectorService::new(client, encoder));

    // create_router adds docs/middleware to the semantic routes
    let router = create_router::<VectorApiDoc>(handlers::router(service.clone()))?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the Vearch master
    let app = router
        .merge(health_router(config.app))
        .merge(health::ready_router(service));

    create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Semantic API shutdown complete");
    Ok(())
}
