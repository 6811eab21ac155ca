//! # base-api Server
//!
//! HTTP API exposing `GET /health`.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin base-api
//!
//! # Run with specific environment
//! ENVIRONMENT=production DATABASE_URL=postgresql://... cargo run --bin base-api
//! ```

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use base_api::config::ConfigLoader;
use base_api::database::{self, DatabaseConnection};
use base_api::health::HealthService;
use base_api::logging;
use base_api::shutdown::shutdown_signal;
use base_api::web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;

    logging::init_tracing(&config.environment);

    info!("Starting base-api server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );
    info!("   Environment: {}", config.environment);

    let database = DatabaseConnection::connect_lazy(&config.database_url, &config.database)
        .context("Invalid DATABASE_URL")?;

    let migrations = database::run_pending(
        &config.migrate_database_url,
        &config.database,
        &config.worker.migrations_dir,
    )
    .await
    .context("Database initialization failed")?;
    info!(outcome = ?migrations, "Database initialized");

    let health_service = Arc::new(HealthService::new(Arc::new(database.clone())));
    let app = create_app(Arc::new(AppState::new(health_service)));

    let bind_address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Closing database connections...");
    database.close().await;

    info!("base-api shutdown complete");
    Ok(())
}
