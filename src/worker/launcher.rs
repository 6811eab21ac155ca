//! # Launch Argument Resolution
//!
//! Turns `base-worker` command-line flags into a [`LaunchMode`].
//!
//! - `--beat` selects the periodic scheduler; `--workers` and `--queue` are
//!   ignored entirely, invalid values included
//! - otherwise worker mode runs `--workers` consumers bound to every queue in
//!   the comma-separated `--queue` list
//!
//! The node display name is `worker_{label}_{hostname}`. The label is the
//! `--queue` value when it names one queue and [`DEFAULT_QUEUE`] when it holds
//! a comma, even though the consumers still bind to every listed queue.

use clap::Parser;
use tracing::warn;

use super::error::{WorkerError, WorkerResult};
use crate::constants::{DEFAULT_QUEUE, DEFAULT_WORKER_CONCURRENCY};
use crate::messaging::validate_queue_name;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "base-worker")]
#[command(about = "Background task worker and periodic scheduler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct LaunchArgs {
    /// Number of concurrent consumers
    #[arg(
        long,
        allow_negative_numbers = true,
        default_value_t = DEFAULT_WORKER_CONCURRENCY as i64
    )]
    pub workers: i64,

    /// Queue name, or comma-separated queue names, to consume from
    #[arg(long, default_value = DEFAULT_QUEUE)]
    pub queue: String,

    /// Run the periodic task scheduler instead of a worker
    #[arg(long)]
    pub beat: bool,
}

impl Default for LaunchArgs {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKER_CONCURRENCY as i64,
            queue: DEFAULT_QUEUE.to_string(),
            beat: false,
        }
    }
}

/// Resolved worker-mode settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOptions {
    pub concurrency: usize,
    pub queues: Vec<String>,
    pub node_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    Worker(WorkerOptions),
    Beat,
}

impl LaunchArgs {
    /// Resolve the flags for a host
    pub fn into_mode(self, hostname: &str) -> WorkerResult<LaunchMode> {
        if self.beat {
            return Ok(LaunchMode::Beat);
        }

        let concurrency = usize::try_from(self.workers)
            .ok()
            .filter(|workers| *workers >= 1)
            .ok_or_else(|| {
                WorkerError::InvalidArguments(format!(
                    "--workers must be at least 1, got {}",
                    self.workers
                ))
            })?;

        let queues = parse_queue_list(&self.queue)?;
        let label = display_queue_label(&self.queue);

        if self.queue.contains(',') {
            warn!(
                queues = ?queues,
                label = %label,
                "Multiple queues requested; node name uses the default queue label"
            );
        }

        Ok(LaunchMode::Worker(WorkerOptions {
            concurrency,
            queues,
            node_name: worker_node_name(label, hostname),
        }))
    }
}

/// Split, trim and validate a comma-separated queue list
///
/// Empty entries are dropped and duplicates keep their first position.
pub fn parse_queue_list(raw: &str) -> WorkerResult<Vec<String>> {
    let mut queues: Vec<String> = Vec::new();

    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        validate_queue_name(name).map_err(|e| WorkerError::InvalidArguments(e.to_string()))?;
        if !queues.iter().any(|queue| queue == name) {
            queues.push(name.to_string());
        }
    }

    if queues.is_empty() {
        return Err(WorkerError::InvalidArguments(format!(
            "--queue {raw:?} names no queue"
        )));
    }

    Ok(queues)
}

/// Queue label used in the node name
pub fn display_queue_label(raw: &str) -> &str {
    if raw.contains(',') {
        DEFAULT_QUEUE
    } else {
        raw.trim()
    }
}

pub fn worker_node_name(label: &str, hostname: &str) -> String {
    format!("worker_{label}_{hostname}")
}
