#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # base-api
//!
//! Service scaffold made of two independent processes:
//!
//! - **`base-api`**: an HTTP API with a single `GET /health` endpoint reporting
//!   database connectivity
//! - **`base-worker`**: a pgmq-backed background worker (worker mode) or periodic
//!   task scheduler (beat mode) that ships with no tasks and no schedules
//!
//! The processes share no in-process state; both talk to PostgreSQL.
//!
//! ## Module Organization
//!
//! - [`config`] - Layered configuration (defaults, files, environment variables)
//! - [`database`] - Connection provider and startup migrations
//! - [`health`] - Health reporting over an injected database probe
//! - [`web`] - axum router for the API service
//! - [`messaging`] - pgmq broker, in-memory broker and result backend
//! - [`worker`] - Task registry, consumers, beat and launch arguments
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use base_api::config::AppConfig;
//! use base_api::database::DatabaseConnection;
//! use base_api::health::HealthService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let database = DatabaseConnection::connect_lazy(&config.database_url, &config.database)?;
//!
//! let health = HealthService::new(Arc::new(database.clone()));
//! let report = health.check_health().await;
//! println!("{}", serde_json::to_string(&report)?);
//!
//! database.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod health;
pub mod logging;
pub mod messaging;
pub mod shutdown;
pub mod web;
pub mod worker;

pub use config::{AppConfig, ConfigLoader, ConfigurationError};
pub use constants::{ComponentStatus, HealthStatus};
pub use error::{BaseApiError, Result};
