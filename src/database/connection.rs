use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::config::{redact_url, DatabasePoolConfig};
use crate::error::Result;

/// Pooled PostgreSQL connection provider
///
/// Constructed by the process entry point and handed to whatever needs the
/// database. The pool is lazy: nothing connects until the first query, so a
/// service can start while the database is down and report it through `/health`.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Build a lazy pool for `database_url`
    ///
    /// Only a malformed URL fails here; connection errors surface on first use.
    pub fn connect_lazy(database_url: &str, pool_config: &DatabasePoolConfig) -> Result<Self> {
        debug!(
            database_url = %redact_url(database_url),
            max_connections = pool_config.max_connections,
            "Creating lazy database pool"
        );

        let pool = pool_options(pool_config).connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Build a pool and open its first connection immediately
    pub async fn connect(database_url: &str, pool_config: &DatabasePoolConfig) -> Result<Self> {
        let pool = pool_options(pool_config).connect(database_url).await?;

        info!(
            database_url = %redact_url(database_url),
            "Database pool connected"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every connection; pending acquires fail afterwards
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn pool_options(pool_config: &DatabasePoolConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(pool_config.max_connections)
        .min_connections(pool_config.min_connections)
        .acquire_timeout(pool_config.acquire_timeout())
        .idle_timeout(Some(pool_config.idle_timeout()))
        .max_lifetime(Some(pool_config.max_lifetime()))
        .test_before_acquire(pool_config.test_before_acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_lazy_does_not_touch_the_network() {
        let connection = DatabaseConnection::connect_lazy(
            "postgresql://nobody@127.0.0.1:1/unreachable",
            &DatabasePoolConfig::default(),
        )
        .unwrap();

        assert!(!connection.is_closed());
        connection.close().await;
        assert!(connection.is_closed());
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_malformed_url() {
        let result = DatabaseConnection::connect_lazy("not a url", &DatabasePoolConfig::default());
        assert!(result.is_err());
    }
}
