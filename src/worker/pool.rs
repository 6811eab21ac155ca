//! # Worker Pool
//!
//! A fixed number of consumers, each bound to every configured queue. A consumer
//! reads one message per queue per pass, runs the handler on Tokio's blocking
//! pool and records the outcome. Poison messages and unknown tasks are archived
//! without running anything. There is no retry.

use futures::future::join_all;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::error::{TaskError, WorkerResult};
use super::task::TaskRegistry;
use crate::messaging::{MessageBroker, QueuedMessage, ResultBackend, TaskOutcome};

/// Counters reported when the pool stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Tasks whose handler ran
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Messages archived without running: undecodable or unknown task
    pub discarded: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    processed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl PoolCounters {
    fn snapshot(&self) -> PoolStats {
        PoolStats {
            processed: self.processed.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Consumer settings shared by every consumer of a pool
#[derive(Debug, Clone)]
pub struct ConsumerSettings {
    pub poll_interval: Duration,
    pub visibility_timeout_seconds: i32,
}

#[derive(Debug)]
pub struct WorkerPool {
    node_name: String,
    queues: Vec<String>,
    concurrency: usize,
    settings: ConsumerSettings,
    broker: Arc<dyn MessageBroker>,
    results: Arc<dyn ResultBackend>,
    tasks: Arc<TaskRegistry>,
}

impl WorkerPool {
    pub fn new(
        node_name: impl Into<String>,
        queues: Vec<String>,
        concurrency: usize,
        settings: ConsumerSettings,
        broker: Arc<dyn MessageBroker>,
        results: Arc<dyn ResultBackend>,
        tasks: Arc<TaskRegistry>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            queues,
            concurrency,
            settings,
            broker,
            results,
            tasks,
        }
    }

    /// Consume until `shutdown` is cancelled; in-flight tasks finish first
    pub async fn run(self, shutdown: CancellationToken) -> WorkerResult<PoolStats> {
        for queue in &self.queues {
            self.broker.create_queue(queue).await?;
        }

        info!(
            node = %self.node_name,
            concurrency = self.concurrency,
            queues = ?self.queues,
            registered_tasks = self.tasks.len(),
            "Worker pool started"
        );

        let counters = Arc::new(PoolCounters::default());
        let consumer = Arc::new(Consumer {
            node_name: self.node_name.clone(),
            queues: self.queues,
            settings: self.settings,
            broker: self.broker,
            results: self.results,
            tasks: self.tasks,
            counters: Arc::clone(&counters),
        });

        let handles = (0..self.concurrency).map(|index| {
            let consumer = Arc::clone(&consumer);
            let shutdown = shutdown.clone();
            tokio::spawn(async move { consumer.run(index, shutdown).await })
        });

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!(error = %e, "Consumer task terminated abnormally");
            }
        }

        let stats = counters.snapshot();
        info!(node = %self.node_name, stats = ?stats, "Worker pool stopped");
        Ok(stats)
    }
}

#[derive(Debug)]
struct Consumer {
    node_name: String,
    queues: Vec<String>,
    settings: ConsumerSettings,
    broker: Arc<dyn MessageBroker>,
    results: Arc<dyn ResultBackend>,
    tasks: Arc<TaskRegistry>,
    counters: Arc<PoolCounters>,
}

impl Consumer {
    async fn run(&self, index: usize, shutdown: CancellationToken) {
        debug!(consumer = index, "Consumer started");

        while !shutdown.is_cancelled() {
            let mut handled = false;

            for queue in &self.queues {
                match self
                    .broker
                    .read(queue, self.settings.visibility_timeout_seconds, 1)
                    .await
                {
                    Ok(messages) => {
                        for message in messages {
                            handled = true;
                            self.handle(queue, message).await;
                        }
                    }
                    Err(e) => error!(consumer = index, queue = %queue, error = %e, "Queue read failed"),
                }
            }

            if !handled {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(self.settings.poll_interval) => {}
                }
            }
        }

        debug!(consumer = index, "Consumer stopped");
    }

    async fn handle(&self, queue: &str, message: QueuedMessage) {
        let message_id = message.message_id;

        let task = match message.task_message() {
            Ok(task) => task,
            Err(e) => {
                warn!(queue = %queue, message_id, error = %e, "Undecodable message archived");
                self.discard(queue, message_id).await;
                return;
            }
        };

        let Some(handler) = self.tasks.get(&task.task_name) else {
            warn!(
                queue = %queue,
                message_id,
                task_name = %task.task_name,
                "No handler registered for task; message archived"
            );
            self.discard(queue, message_id).await;
            return;
        };

        self.counters.processed.fetch_add(1, Ordering::Relaxed);
        debug!(task_id = %task.id, task_name = %task.task_name, "Executing task");

        let payload = task.payload.clone();
        let executed = tokio::task::spawn_blocking(move || handler.execute(payload)).await;

        let outcome = match executed {
            Ok(Ok(value)) => TaskOutcome::succeeded(&task, &self.node_name, value),
            Ok(Err(e)) => TaskOutcome::failed(&task, &self.node_name, e.to_string()),
            Err(e) => {
                let failure = if e.is_panic() {
                    TaskError::Panicked(panic_message(e.into_panic()))
                } else {
                    TaskError::execution(e.to_string())
                };
                TaskOutcome::failed(&task, &self.node_name, failure.to_string())
            }
        };

        if let Err(e) = self.results.store(&outcome).await {
            error!(task_id = %task.id, error = %e, "Failed to store task outcome");
        }

        let acked = if outcome.is_success() {
            self.counters.succeeded.fetch_add(1, Ordering::Relaxed);
            self.broker.delete(queue, message_id).await
        } else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                task_id = %task.id,
                task_name = %task.task_name,
                error = outcome.error.as_deref().unwrap_or_default(),
                "Task failed; message archived"
            );
            self.broker.archive(queue, message_id).await
        };

        if let Err(e) = acked {
            error!(queue = %queue, message_id, error = %e, "Failed to settle message");
        }
    }

    async fn discard(&self, queue: &str, message_id: i64) {
        self.counters.discarded.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.broker.archive(queue, message_id).await {
            error!(queue = %queue, message_id, error = %e, "Failed to archive message");
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(7_u8)), "non-string panic payload");
    }
}
