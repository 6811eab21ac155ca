//! # Messaging Module
//!
//! PostgreSQL message queue (pgmq) based messaging between task producers and
//! worker consumers.
//!
//! - [`MessageBroker`] - queue operations the worker and scheduler rely on
//! - [`PgmqClient`] - broker backed by the pgmq extension through sqlx
//! - [`InMemoryBroker`] - process-local broker for tests and local runs
//! - [`ResultBackend`] - where task outcomes are recorded

pub mod errors;
pub mod in_memory;
pub mod message;
pub mod pgmq_client;
pub mod result_backend;

use async_trait::async_trait;

use crate::constants::MAX_QUEUE_NAME_LENGTH;

pub use errors::{MessagingError, MessagingResult};
pub use in_memory::InMemoryBroker;
pub use message::{OutcomeStatus, QueuedMessage, TaskMessage, TaskOutcome};
pub use pgmq_client::PgmqClient;
pub use result_backend::{QueueResultBackend, ResultBackend};

/// Queue operations shared by every broker implementation
#[async_trait]
pub trait MessageBroker: Send + Sync + std::fmt::Debug {
    /// Create the queue if it does not exist
    async fn create_queue(&self, queue_name: &str) -> MessagingResult<()>;

    /// Send a JSON payload, returning the broker's message id
    async fn send_json(&self, queue_name: &str, payload: &serde_json::Value)
        -> MessagingResult<i64>;

    /// Read up to `limit` visible messages, hiding them for `visibility_timeout_seconds`
    async fn read(
        &self,
        queue_name: &str,
        visibility_timeout_seconds: i32,
        limit: i32,
    ) -> MessagingResult<Vec<QueuedMessage>>;

    /// Acknowledge a message by deleting it
    async fn delete(&self, queue_name: &str, message_id: i64) -> MessagingResult<()>;

    /// Move a message to the queue's archive
    async fn archive(&self, queue_name: &str, message_id: i64) -> MessagingResult<()>;

    /// Send a task message
    async fn send_task(&self, queue_name: &str, task: &TaskMessage) -> MessagingResult<i64> {
        let payload = serde_json::to_value(task)?;
        self.send_json(queue_name, &payload).await
    }
}

/// Check a queue name against pgmq's naming rules
pub fn validate_queue_name(queue_name: &str) -> MessagingResult<()> {
    if queue_name.is_empty() {
        return Err(MessagingError::invalid_queue_name(
            queue_name,
            "queue name cannot be empty",
        ));
    }

    if queue_name.len() > MAX_QUEUE_NAME_LENGTH {
        return Err(MessagingError::invalid_queue_name(
            queue_name,
            format!("queue name exceeds {MAX_QUEUE_NAME_LENGTH} characters"),
        ));
    }

    if !queue_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(MessagingError::invalid_queue_name(
            queue_name,
            "only ASCII letters, digits and underscores are allowed",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_queue_name() {
        assert!(validate_queue_name("default").is_ok());
        assert!(validate_queue_name("emails_high_priority").is_ok());
        assert!(validate_queue_name("").is_err());
        assert!(validate_queue_name("with-dash").is_err());
        assert!(validate_queue_name("a,b").is_err());
        assert!(validate_queue_name(&"q".repeat(MAX_QUEUE_NAME_LENGTH)).is_ok());
        assert!(validate_queue_name(&"q".repeat(MAX_QUEUE_NAME_LENGTH + 1)).is_err());
    }
}
