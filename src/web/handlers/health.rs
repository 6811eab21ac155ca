//! # Health Check Handler

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::health::HealthReport;
use crate::web::state::AppState;

/// Health check endpoint: GET /health
///
/// Always answers 200. Dependency failures are reported in the body, never as
/// an error status.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.health_service().check_health().await)
}
