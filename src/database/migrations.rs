//! # Startup Migrations
//!
//! Applies pending SQL migrations from the configured directory against the
//! migration database. The scaffold ships no migrations, so with no directory
//! present this is a no-op and opens no connection.
//!
//! Migration files follow sqlx's naming convention: `<VERSION>_<description>.sql`.

use sqlx::migrate::Migrator;
use std::path::Path;
use tracing::{debug, info};

use super::DatabaseConnection;
use crate::config::DatabasePoolConfig;
use crate::error::Result;

/// Outcome of [`run_pending`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No migrations directory; nothing to do
    Skipped,
    /// Migrator ran; `known` scripts were found in the directory
    Applied { known: usize },
}

/// Run every pending migration found in `migrations_dir`
pub async fn run_pending(
    migrate_database_url: &str,
    pool_config: &DatabasePoolConfig,
    migrations_dir: &Path,
) -> Result<MigrationOutcome> {
    if !migrations_dir.is_dir() {
        debug!(
            migrations_dir = %migrations_dir.display(),
            "No migrations directory - skipping schema setup"
        );
        return Ok(MigrationOutcome::Skipped);
    }

    let migrator = Migrator::new(migrations_dir.to_path_buf()).await?;
    let known = migrator.iter().count();

    let connection = DatabaseConnection::connect(migrate_database_url, pool_config).await?;
    let outcome = migrator.run(connection.pool()).await;
    connection.close().await;
    outcome?;

    info!(
        migrations_dir = %migrations_dir.display(),
        known_migrations = known,
        "Database migrations applied"
    );

    Ok(MigrationOutcome::Applied { known })
}
