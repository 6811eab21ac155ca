//! # Result Backend
//!
//! Stores the outcome of each executed task. The production backend is a pgmq
//! queue (`task_results` by default) on the result backend database, so outcomes
//! can be read back by whoever enqueued the work.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::errors::MessagingResult;
use super::message::TaskOutcome;
use super::MessageBroker;

#[async_trait]
pub trait ResultBackend: Send + Sync + std::fmt::Debug {
    async fn store(&self, outcome: &TaskOutcome) -> MessagingResult<()>;
}

/// Result backend that appends outcomes to a broker queue
#[derive(Debug, Clone)]
pub struct QueueResultBackend {
    broker: Arc<dyn MessageBroker>,
    queue_name: String,
}

impl QueueResultBackend {
    pub fn new(broker: Arc<dyn MessageBroker>, queue_name: impl Into<String>) -> Self {
        Self {
            broker,
            queue_name: queue_name.into(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Create the results queue
    pub async fn initialize(&self) -> MessagingResult<()> {
        self.broker.create_queue(&self.queue_name).await
    }
}

#[async_trait]
impl ResultBackend for QueueResultBackend {
    async fn store(&self, outcome: &TaskOutcome) -> MessagingResult<()> {
        let payload = serde_json::to_value(outcome)?;
        let message_id = self.broker.send_json(&self.queue_name, &payload).await?;
        debug!(
            task_id = %outcome.task_id,
            message_id,
            queue = %self.queue_name,
            "Task outcome stored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{InMemoryBroker, TaskMessage};
    use serde_json::json;

    #[tokio::test]
    async fn test_outcomes_land_on_results_queue() {
        let broker = Arc::new(InMemoryBroker::new());
        let backend = QueueResultBackend::new(broker.clone(), "task_results");
        backend.initialize().await.unwrap();

        let task = TaskMessage::new("add", json!([1, 2]));
        backend
            .store(&TaskOutcome::succeeded(&task, "worker_default_host", json!(3)))
            .await
            .unwrap();

        let stored = broker.payloads("task_results").await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["status"], "succeeded");
        assert_eq!(stored[0]["result"], 3);
        assert_eq!(stored[0]["task_id"], json!(task.id));
    }
}
