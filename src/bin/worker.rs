//! # base-worker
//!
//! Background worker and periodic scheduler.
//!
//! ## Usage
//!
//! ```bash
//! # Four consumers on the default queue
//! cargo run --bin base-worker
//!
//! # Two consumers bound to two queues (node name uses the "default" label)
//! cargo run --bin base-worker -- --workers 2 --queue emails,reports
//!
//! # Periodic scheduler
//! cargo run --bin base-worker -- --beat
//! ```

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use base_api::config::ConfigLoader;
use base_api::logging;
use base_api::shutdown::cancel_on_shutdown;
use base_api::worker::{LaunchArgs, LaunchMode, WorkerApp, WorkerConnections};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = LaunchArgs::parse();

    let config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;

    logging::init_tracing(&config.environment);

    let hostname = match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!(error = %e, "Could not resolve hostname; using \"localhost\"");
            "localhost".to_string()
        }
    };

    let mode = args
        .into_mode(&hostname)
        .context("Invalid worker arguments")?;

    info!("Starting base-worker...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!("   Environment: {}", config.environment);

    let connections = WorkerConnections::connect(&config)
        .await
        .context("Failed to connect to broker or result backend")?;

    let app = WorkerApp::builder()
        .settings(config.worker.clone())
        .build(connections.broker.clone(), connections.results.clone())
        .context("Worker configuration failed")?;

    let shutdown = CancellationToken::new();
    let signal_task = cancel_on_shutdown(shutdown.clone());

    let outcome = match mode {
        LaunchMode::Worker(options) => {
            info!(
                node = %options.node_name,
                concurrency = options.concurrency,
                queues = ?options.queues,
                "Running in worker mode"
            );
            app.run_worker(&options, shutdown.clone())
                .await
                .map(|stats| info!(stats = ?stats, "Worker finished"))
        }
        LaunchMode::Beat => {
            info!("Running in beat mode");
            app.run_beat(shutdown.clone())
                .await
                .map(|stats| info!(emitted = stats.emitted, "Beat finished"))
        }
    };

    shutdown.cancel();
    if let Err(e) = signal_task.await {
        error!(error = %e, "Shutdown signal task terminated abnormally");
    }
    connections.close().await;

    outcome.context("Worker terminated with an error")?;
    info!("base-worker shutdown complete");
    Ok(())
}
