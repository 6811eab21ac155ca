//! API Web Module
//!
//! The HTTP surface of the API service: exactly one route, `GET /health`.

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the web application with its routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let common_middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    let app = Router::new()
        .merge(routes::health_routes())
        .layer(common_middleware)
        .with_state(state);

    info!("Web application created");
    app
}
