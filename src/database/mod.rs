//! # Database
//!
//! Connection provider and startup migrations.
//!
//! - [`connection`] - pooled, explicitly constructed connection provider
//! - [`migrations`] - schema migrations applied when the API starts
//!
//! ```rust,no_run
//! use base_api::config::AppConfig;
//! use base_api::database::DatabaseConnection;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let database = DatabaseConnection::connect_lazy(&config.database_url, &config.database)?;
//! // hand `database` to the services that need it ...
//! database.close().await;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::{run_pending, MigrationOutcome};
