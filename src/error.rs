//! Error types for the base-api crate.
//!

use thiserror::Error;

use crate::config::ConfigurationError;

#[derive(Debug, Error)]
pub enum BaseApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Migration error: {0}")]
    MigrationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
}

impl From<sqlx::Error> for BaseApiError {
    fn from(err: sqlx::Error) -> Self {
        BaseApiError::DatabaseError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for BaseApiError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        BaseApiError::MigrationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BaseApiError>;
