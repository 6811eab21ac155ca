//! Connectivity probe seam between the health service and the database.

use async_trait::async_trait;

use crate::database::DatabaseConnection;
use crate::error::Result;

/// Statement issued on every health check
pub const PROBE_QUERY: &str = "SELECT 1";

/// Value a healthy database returns for [`PROBE_QUERY`]
pub const PROBE_EXPECTED: i64 = 1;

#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Run [`PROBE_QUERY`] and return the scalar it produced
    async fn probe(&self) -> Result<i64>;
}

#[async_trait]
impl DatabaseProbe for DatabaseConnection {
    async fn probe(&self) -> Result<i64> {
        // Scoped checkout: returned to the pool when `conn` drops, on either path
        let mut conn = self.pool().acquire().await?;
        let value: i32 = sqlx::query_scalar(PROBE_QUERY).fetch_one(&mut *conn).await?;
        Ok(i64::from(value))
    }
}
