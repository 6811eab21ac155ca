//! # PostgreSQL Message Queue Client
//!
//! Broker backed by the pgmq extension. Queue operations are plain SQL calls to
//! the `pgmq.*` functions over a shared sqlx pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use super::errors::{MessagingError, MessagingResult};
use super::message::QueuedMessage;
use super::{validate_queue_name, MessageBroker};

/// pgmq broker over an existing connection pool
#[derive(Debug, Clone)]
pub struct PgmqClient {
    pool: PgPool,
}

impl PgmqClient {
    /// Create client using existing connection pool
    pub fn new_with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get reference to underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MessageBroker for PgmqClient {
    #[instrument(skip(self), fields(queue = %queue_name))]
    async fn create_queue(&self, queue_name: &str) -> MessagingResult<()> {
        validate_queue_name(queue_name)?;

        sqlx::query("SELECT pgmq.create($1)")
            .bind(queue_name)
            .execute(&self.pool)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "create", e.to_string()))?;

        info!("Queue ready: {}", queue_name);
        Ok(())
    }

    #[instrument(skip(self, payload), fields(queue = %queue_name))]
    async fn send_json(
        &self,
        queue_name: &str,
        payload: &serde_json::Value,
    ) -> MessagingResult<i64> {
        let message_id: i64 = sqlx::query_scalar("SELECT * FROM pgmq.send($1, $2)")
            .bind(queue_name)
            .bind(payload)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "send", e.to_string()))?;

        debug!(message_id, "Message sent to queue: {}", queue_name);
        Ok(message_id)
    }

    #[instrument(skip(self), fields(queue = %queue_name))]
    async fn read(
        &self,
        queue_name: &str,
        visibility_timeout_seconds: i32,
        limit: i32,
    ) -> MessagingResult<Vec<QueuedMessage>> {
        let rows: Vec<(i64, i32, DateTime<Utc>, serde_json::Value)> = sqlx::query_as(
            "SELECT msg_id, read_ct, enqueued_at, message FROM pgmq.read($1, $2, $3)",
        )
        .bind(queue_name)
        .bind(visibility_timeout_seconds)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MessagingError::queue_operation(queue_name, "read", e.to_string()))?;

        if !rows.is_empty() {
            debug!(count = rows.len(), "Read messages from queue: {}", queue_name);
        }

        Ok(rows
            .into_iter()
            .map(|(message_id, read_count, enqueued_at, payload)| QueuedMessage {
                message_id,
                read_count,
                enqueued_at,
                payload,
            })
            .collect())
    }

    #[instrument(skip(self), fields(queue = %queue_name, msg_id = %message_id))]
    async fn delete(&self, queue_name: &str, message_id: i64) -> MessagingResult<()> {
        let deleted: bool = sqlx::query_scalar("SELECT pgmq.delete($1, $2::bigint)")
            .bind(queue_name)
            .bind(message_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "delete", e.to_string()))?;

        if !deleted {
            warn!("Message {} was not present in {}", message_id, queue_name);
            return Err(MessagingError::message_not_found(queue_name, message_id));
        }

        debug!("Message deleted: {}", message_id);
        Ok(())
    }

    #[instrument(skip(self), fields(queue = %queue_name, msg_id = %message_id))]
    async fn archive(&self, queue_name: &str, message_id: i64) -> MessagingResult<()> {
        let archived: bool = sqlx::query_scalar("SELECT pgmq.archive($1, $2::bigint)")
            .bind(queue_name)
            .bind(message_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "archive", e.to_string()))?;

        if !archived {
            warn!("Message {} was not present in {}", message_id, queue_name);
            return Err(MessagingError::message_not_found(queue_name, message_id));
        }

        debug!("Message archived: {}", message_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabasePoolConfig;
    use crate::database::DatabaseConnection;

    #[tokio::test]
    async fn test_create_queue_rejects_invalid_name_before_touching_database() {
        let connection = DatabaseConnection::connect_lazy(
            "postgresql://nobody@127.0.0.1:1/unreachable",
            &DatabasePoolConfig::default(),
        )
        .unwrap();
        let client = PgmqClient::new_with_pool(connection.pool().clone());

        let result = client.create_queue("not-valid").await;
        assert!(matches!(
            result,
            Err(MessagingError::InvalidQueueName { .. })
        ));
    }
}
