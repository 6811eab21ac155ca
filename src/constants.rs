//! # Service Constants
//!
//! Fixed identifiers and defaults shared by the API service and the worker launcher.

use serde::{Deserialize, Serialize};

/// Identifier reported in every health report
pub const SERVICE_NAME: &str = "base-api";

/// Name of the database entry in `HealthReport::checks`
pub const DATABASE_CHECK: &str = "database";

/// Queue consumed when no queue is given, and the display label used when several are
pub const DEFAULT_QUEUE: &str = "default";

/// Default number of concurrent task consumers in worker mode
pub const DEFAULT_WORKER_CONCURRENCY: usize = 4;

/// Queue receiving task outcomes in the result backend
pub const DEFAULT_RESULTS_QUEUE: &str = "task_results";

/// pgmq prefixes queue tables (`q_`, `a_`), which leaves 47 characters for the name
pub const MAX_QUEUE_NAME_LENGTH: usize = 47;

/// Environment names with special handling
pub mod environments {
    pub const DEVELOPMENT: &str = "development";
    pub const TESTING: &str = "testing";
    pub const PRODUCTION: &str = "production";
}

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Status of a single dependency check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Healthy => "healthy",
            ComponentStatus::Unhealthy => "unhealthy",
            ComponentStatus::Unknown => "unknown",
        }
    }

    /// Only an explicit failure degrades the overall status
    pub fn is_problematic(&self) -> bool {
        matches!(self, ComponentStatus::Unhealthy)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
        assert_eq!(
            serde_json::to_string(&ComponentStatus::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_unknown_is_not_problematic() {
        assert!(!ComponentStatus::Unknown.is_problematic());
        assert!(!ComponentStatus::Healthy.is_problematic());
        assert!(ComponentStatus::Unhealthy.is_problematic());
    }

    #[test]
    fn test_default_queue_fits_pgmq_limit() {
        assert!(DEFAULT_QUEUE.len() <= MAX_QUEUE_NAME_LENGTH);
        assert!(DEFAULT_RESULTS_QUEUE.len() <= MAX_QUEUE_NAME_LENGTH);
    }
}
