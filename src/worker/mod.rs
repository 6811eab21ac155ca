//! # Worker
//!
//! Background task worker and periodic scheduler.
//!
//! - [`launcher`] - `base-worker` flags resolved to a [`LaunchMode`]
//! - [`bootstrap`] - [`WorkerApp`] assembly and the configure hooks
//! - [`pool`] - queue consumers executing registered [`TaskHandler`]s
//! - [`beat`] - periodic emission of [`PeriodicSchedule`]s
//! - [`bridge`] - running async task bodies from the synchronous entry point

pub mod beat;
pub mod bootstrap;
pub mod bridge;
pub mod error;
pub mod launcher;
pub mod pool;
pub mod schedule;
pub mod task;

pub use beat::{Beat, BeatStats};
pub use bootstrap::{
    setup_periodic_tasks, ConfigureHook, WorkerApp, WorkerAppBuilder, WorkerConnections,
};
pub use bridge::{AsyncTaskAdapter, TaskBridge};
pub use error::{TaskError, TaskResult, WorkerError, WorkerResult};
pub use launcher::{LaunchArgs, LaunchMode, WorkerOptions};
pub use pool::{ConsumerSettings, PoolStats, WorkerPool};
pub use schedule::{PeriodicSchedule, ScheduleRegistry};
pub use task::{AsyncTask, TaskHandler, TaskRegistry};
