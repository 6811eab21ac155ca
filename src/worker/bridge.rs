//! # Async-to-Sync Bridge
//!
//! Task bodies are synchronous entry points, but a body may need to await.
//! [`TaskBridge`] owns a dedicated Tokio runtime and drives an async body to
//! completion from a synchronous call site. It must be called from a plain
//! thread or from Tokio's blocking pool, never from inside an async task.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::error::{TaskError, TaskResult, WorkerError, WorkerResult};
use super::task::{AsyncTask, TaskHandler};

/// Dedicated runtime for running async task bodies synchronously
#[derive(Debug)]
pub struct TaskBridge {
    // Taken in Drop: dropping a runtime from async context panics
    runtime: Option<Runtime>,
}

impl TaskBridge {
    pub fn new() -> WorkerResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("base-worker-bridge")
            .enable_all()
            .build()
            .map_err(|e| WorkerError::Runtime(format!("failed to build bridge runtime: {e}")))?;

        debug!("Task bridge runtime started");
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Block the calling thread until `body` completes
    pub fn run<F, T>(&self, body: F) -> TaskResult<T>
    where
        F: Future<Output = TaskResult<T>>,
    {
        match &self.runtime {
            Some(runtime) => runtime.block_on(body),
            None => Err(TaskError::Runtime("bridge runtime shut down".to_string())),
        }
    }
}

impl Drop for TaskBridge {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Exposes an [`AsyncTask`] through the synchronous [`TaskHandler`] entry point
pub struct AsyncTaskAdapter {
    task: Arc<dyn AsyncTask>,
    bridge: Arc<TaskBridge>,
}

impl AsyncTaskAdapter {
    pub fn new(task: Arc<dyn AsyncTask>, bridge: Arc<TaskBridge>) -> Self {
        Self { task, bridge }
    }
}

impl std::fmt::Debug for AsyncTaskAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTaskAdapter")
            .field("task", &self.task.name())
            .finish()
    }
}

impl TaskHandler for AsyncTaskAdapter {
    fn name(&self) -> &str {
        self.task.name()
    }

    fn execute(&self, payload: Value) -> TaskResult<Value> {
        self.bridge.run(self.task.run(payload))
    }
}
