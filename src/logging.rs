//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//! Both binaries log to stdout, which is what container runtimes collect.
//!
//! - `production` logs at `info`
//! - every other environment logs at `debug`, which also surfaces the SQL
//!   statements sqlx emits
//! - `RUST_LOG`, when set, replaces the environment default

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::environments;

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging for the given environment
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing(environment: &str) {
    TRACING_INITIALIZED.get_or_init(|| {
        let log_level = get_log_level(environment);
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(use_ansi)
            .with_filter(filter);

        let subscriber = tracing_subscriber::registry().with(console_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Get log level based on environment
pub fn get_log_level(environment: &str) -> &'static str {
    match environment {
        environments::PRODUCTION => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("testing"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("staging"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing("testing");
        init_tracing("production");
        assert!(TRACING_INITIALIZED.get().is_some());
    }
}
