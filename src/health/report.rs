use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{ComponentStatus, HealthStatus, DATABASE_CHECK, SERVICE_NAME};

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub service: String,
    pub checks: BTreeMap<String, ComponentStatus>,
}

impl HealthReport {
    /// Report before any dependency has been probed
    pub fn new() -> Self {
        let mut checks = BTreeMap::new();
        checks.insert(DATABASE_CHECK.to_string(), ComponentStatus::Unknown);

        Self {
            status: HealthStatus::Healthy,
            service: SERVICE_NAME.to_string(),
            checks,
        }
    }

    /// Record a dependency result; any unhealthy dependency makes the report unhealthy
    pub fn record(&mut self, check: &str, status: ComponentStatus) {
        if status.is_problematic() {
            self.status = HealthStatus::Unhealthy;
        }
        self.checks.insert(check.to_string(), status);
    }

    pub fn check(&self, name: &str) -> Option<ComponentStatus> {
        self.checks.get(name).copied()
    }
}

impl Default for HealthReport {
    fn default() -> Self {
        Self::new()
    }
}
