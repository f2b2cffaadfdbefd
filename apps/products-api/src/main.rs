//! Products API - REST server over PostgreSQL

use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::{error, info};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        max_connections = config.postgres.max_connections,
        "Connecting to PostgreSQL"
    );
    let db = connect_from_config_with_retry(config.postgres.clone(), Some(config.retry.clone()))
        .await?;
    info!("Successfully connected to PostgreSQL");

    if config.postgres.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name).await?;
    }

    let state = AppState { config, db };

    let api_routes = api::routes(&state);
    let app = create_router::<openapi::ApiDoc>(api_routes)?
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!(port = state.config.server.port, "Starting Products API");

    let db = state.db.clone();
    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing PostgreSQL pool");
        match db.close().await {
            Ok(()) => info!("PostgreSQL pool closed"),
            Err(e) => error!(error = %e, "Failed to close PostgreSQL pool"),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
