//! # Health
//!
//! Database-backed health reporting for the API service.
//!
//! [`HealthService`] runs one connectivity probe per call through an injected
//! [`DatabaseProbe`] and folds the result into a [`HealthReport`]. It never
//! returns an error: probe failures become an `unhealthy` report.

pub mod probe;
pub mod report;
pub mod service;

pub use probe::{DatabaseProbe, PROBE_EXPECTED, PROBE_QUERY};
pub use report::HealthReport;
pub use service::HealthService;
