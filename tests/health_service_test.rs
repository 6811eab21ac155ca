mod common;

use std::sync::Arc;

use base_api::constants::{ComponentStatus, HealthStatus, DATABASE_CHECK, SERVICE_NAME};
use base_api::health::HealthService;
use common::{FailingProbe, StaticProbe};

#[tokio::test]
async fn test_healthy_database_reports_healthy() {
    let probe = Arc::new(StaticProbe::returning(1));
    let service = HealthService::new(probe.clone());

    let report = service.check_health().await;

    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.check(DATABASE_CHECK), Some(ComponentStatus::Healthy));
    assert_eq!(probe.calls(), 1);
}

#[tokio::test]
async fn test_probe_failure_reports_unhealthy_without_failing() {
    let service = HealthService::new(Arc::new(FailingProbe));

    let report = service.check_health().await;

    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert_eq!(
        report.check(DATABASE_CHECK),
        Some(ComponentStatus::Unhealthy)
    );
}

#[tokio::test]
async fn test_unexpected_probe_value_reports_unhealthy() {
    let service = HealthService::new(Arc::new(StaticProbe::returning(2)));

    let report = service.check_health().await;

    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert_eq!(
        report.check(DATABASE_CHECK),
        Some(ComponentStatus::Unhealthy)
    );
}

#[tokio::test]
async fn test_service_name_is_constant() {
    let healthy = HealthService::new(Arc::new(StaticProbe::returning(1)));
    let unhealthy = HealthService::new(Arc::new(FailingProbe));

    assert_eq!(healthy.check_health().await.service, SERVICE_NAME);
    assert_eq!(unhealthy.check_health().await.service, SERVICE_NAME);
}

#[tokio::test]
async fn test_every_call_probes_again() {
    let probe = Arc::new(StaticProbe::returning(1));
    let service = HealthService::new(probe.clone());

    for _ in 0..3 {
        service.check_health().await;
    }

    assert_eq!(probe.calls(), 3);
}
