//! # Health Service
//!
//! Health check logic independent of the HTTP layer.

use std::sync::Arc;
use tracing::{debug, error, warn};

use super::probe::{DatabaseProbe, PROBE_EXPECTED};
use super::report::HealthReport;
use crate::constants::{ComponentStatus, DATABASE_CHECK};

/// Health Service
///
/// Holds the probe it was built with and produces a fresh [`HealthReport`]
/// per call. There is no caching, retry or timeout.
pub struct HealthService {
    database: Arc<dyn DatabaseProbe>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("database", &"<probe>")
            .finish()
    }
}

impl HealthService {
    pub fn new(database: Arc<dyn DatabaseProbe>) -> Self {
        Self { database }
    }

    /// Probe every dependency and build the report
    pub async fn check_health(&self) -> HealthReport {
        let mut report = HealthReport::new();
        report.record(DATABASE_CHECK, self.check_database().await);

        debug!(status = %report.status, "Health check completed");
        report
    }

    async fn check_database(&self) -> ComponentStatus {
        match self.database.probe().await {
            Ok(PROBE_EXPECTED) => ComponentStatus::Healthy,
            Ok(value) => {
                warn!(
                    value,
                    expected = PROBE_EXPECTED,
                    "Database probe returned an unexpected value"
                );
                ComponentStatus::Unhealthy
            }
            Err(e) => {
                error!(error = %e, "Database health check failed");
                ComponentStatus::Unhealthy
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HealthStatus;
    use crate::error::{BaseApiError, Result};
    use async_trait::async_trait;

    struct FixedProbe(i64);

    #[async_trait]
    impl DatabaseProbe for FixedProbe {
        async fn probe(&self) -> Result<i64> {
            Ok(self.0)
        }
    }

    struct BrokenProbe;

    #[async_trait]
    impl DatabaseProbe for BrokenProbe {
        async fn probe(&self) -> Result<i64> {
            Err(BaseApiError::DatabaseError("connection refused".to_string()))
        }
    }

    #[test]
    fn test_expected_value_is_healthy() {
        let service = HealthService::new(Arc::new(FixedProbe(1)));
        let report = tokio_test::block_on(service.check_health());

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.check(DATABASE_CHECK), Some(ComponentStatus::Healthy));
    }

    #[test]
    fn test_unexpected_value_is_unhealthy() {
        let service = HealthService::new(Arc::new(FixedProbe(2)));
        let report = tokio_test::block_on(service.check_health());

        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(
            report.check(DATABASE_CHECK),
            Some(ComponentStatus::Unhealthy)
        );
    }

    #[test]
    fn test_probe_error_is_unhealthy() {
        let service = HealthService::new(Arc::new(BrokenProbe));
        let report = tokio_test::block_on(service.check_health());

        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(
            report.check(DATABASE_CHECK),
            Some(ComponentStatus::Unhealthy)
        );
    }
}
