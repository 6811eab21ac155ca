//! # Message Structures for pgmq Queues
//!
//! Task messages consumed by workers, the broker's view of a read message,
//! and the outcome record stored in the result backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::MessagingResult;

/// Unit of work placed on a task queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMessage {
    pub id: Uuid,
    /// Registered task handler name
    pub task_name: String,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    /// Producer of the message, e.g. the periodic schedule that emitted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl TaskMessage {
    pub fn new(task_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_name: task_name.into(),
            payload,
            enqueued_at: Utc::now(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// A message as returned by a broker read
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedMessage {
    pub message_id: i64,
    /// Number of times the message has been read, this read included
    pub read_count: i32,
    pub enqueued_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl QueuedMessage {
    /// Decode the payload as a [`TaskMessage`]
    pub fn task_message(&self) -> MessagingResult<TaskMessage> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// Result of executing one task, as stored in the result backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: Uuid,
    pub task_name: String,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Node name of the worker that ran the task
    pub worker: String,
    pub completed_at: DateTime<Utc>,
}

impl TaskOutcome {
    pub fn succeeded(task: &TaskMessage, worker: &str, result: serde_json::Value) -> Self {
        Self {
            task_id: task.id,
            task_name: task.task_name.clone(),
            status: OutcomeStatus::Succeeded,
            result: Some(result),
            error: None,
            worker: worker.to_string(),
            completed_at: Utc::now(),
        }
    }

    pub fn failed(task: &TaskMessage, worker: &str, error: impl Into<String>) -> Self {
        Self {
            task_id: task.id,
            task_name: task.task_name.clone(),
            status: OutcomeStatus::Failed,
            result: None,
            error: Some(error.into()),
            worker: worker.to_string(),
            completed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queued_message_decodes_task() {
        let task = TaskMessage::new("send_digest", json!({"user_id": 7})).with_origin("nightly");
        let queued = QueuedMessage {
            message_id: 1,
            read_count: 1,
            enqueued_at: Utc::now(),
            payload: serde_json::to_value(&task).unwrap(),
        };

        assert_eq!(queued.task_message().unwrap(), task);
    }

    #[test]
    fn test_queued_message_rejects_foreign_payload() {
        let queued = QueuedMessage {
            message_id: 1,
            read_count: 1,
            enqueued_at: Utc::now(),
            payload: json!({"step_id": 12}),
        };

        assert!(queued.task_message().is_err());
    }

    #[test]
    fn test_outcome_shape() {
        let task = TaskMessage::new("noop", json!(null));
        let failed = TaskOutcome::failed(&task, "worker_default_host", "boom");
        let value = serde_json::to_value(&failed).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "boom");
        assert!(value.get("result").is_none());
        assert!(!failed.is_success());
    }
}
