//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::health::HealthService;

#[derive(Debug, Clone)]
pub struct AppState {
    health_service: Arc<HealthService>,
}

impl AppState {
    pub fn new(health_service: Arc<HealthService>) -> Self {
        Self { health_service }
    }

    pub fn health_service(&self) -> &HealthService {
        &self.health_service
    }
}
