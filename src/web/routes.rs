use axum::{routing::get, Router};
use std::sync::Arc;

use crate::web::{handlers, state::AppState};

/// Health check route for monitoring and container probes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}
