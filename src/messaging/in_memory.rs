//! # In-Memory Broker
//!
//! Process-local [`MessageBroker`] with pgmq's visibility-timeout semantics.
//! Used by tests and by local runs that have no Postgres.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::errors::{MessagingError, MessagingResult};
use super::message::QueuedMessage;
use super::{validate_queue_name, MessageBroker};

#[derive(Debug, Clone)]
struct StoredMessage {
    message: QueuedMessage,
    visible_at: Instant,
}

#[derive(Debug, Default)]
struct InMemoryQueue {
    messages: BTreeMap<i64, StoredMessage>,
    archived: Vec<QueuedMessage>,
}

#[derive(Debug, Default)]
struct BrokerState {
    next_message_id: i64,
    queues: HashMap<String, InMemoryQueue>,
}

/// Broker that keeps queues in memory
#[derive(Debug, Default)]
pub struct InMemoryBroker {
    state: Mutex<BrokerState>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages still in the queue, visible or not
    pub async fn len(&self, queue_name: &str) -> usize {
        let state = self.state.lock().await;
        state
            .queues
            .get(queue_name)
            .map(|queue| queue.messages.len())
            .unwrap_or(0)
    }

    pub async fn is_empty(&self, queue_name: &str) -> bool {
        self.len(queue_name).await == 0
    }

    /// Messages moved to the queue's archive
    pub async fn archived(&self, queue_name: &str) -> Vec<QueuedMessage> {
        let state = self.state.lock().await;
        state
            .queues
            .get(queue_name)
            .map(|queue| queue.archived.clone())
            .unwrap_or_default()
    }

    /// Payloads of every message still in the queue, in send order
    pub async fn payloads(&self, queue_name: &str) -> Vec<serde_json::Value> {
        let state = self.state.lock().await;
        state
            .queues
            .get(queue_name)
            .map(|queue| {
                queue
                    .messages
                    .values()
                    .map(|stored| stored.message.payload.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn create_queue(&self, queue_name: &str) -> MessagingResult<()> {
        validate_queue_name(queue_name)?;
        let mut state = self.state.lock().await;
        state.queues.entry(queue_name.to_string()).or_default();
        Ok(())
    }

    async fn send_json(
        &self,
        queue_name: &str,
        payload: &serde_json::Value,
    ) -> MessagingResult<i64> {
        let mut state = self.state.lock().await;
        state.next_message_id += 1;
        let message_id = state.next_message_id;

        let queue = state
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        queue.messages.insert(
            message_id,
            StoredMessage {
                message: QueuedMessage {
                    message_id,
                    read_count: 0,
                    enqueued_at: Utc::now(),
                    payload: payload.clone(),
                },
                visible_at: Instant::now(),
            },
        );

        Ok(message_id)
    }

    async fn read(
        &self,
        queue_name: &str,
        visibility_timeout_seconds: i32,
        limit: i32,
    ) -> MessagingResult<Vec<QueuedMessage>> {
        let mut state = self.state.lock().await;
        let queue = state
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let now = Instant::now();
        let hidden_until = now + Duration::from_secs(visibility_timeout_seconds.max(0) as u64);
        let limit = limit.max(0) as usize;

        let mut read = Vec::new();
        for stored in queue.messages.values_mut() {
            if read.len() >= limit {
                break;
            }
            if stored.visible_at > now {
                continue;
            }
            stored.visible_at = hidden_until;
            stored.message.read_count += 1;
            read.push(stored.message.clone());
        }

        Ok(read)
    }

    async fn delete(&self, queue_name: &str, message_id: i64) -> MessagingResult<()> {
        let mut state = self.state.lock().await;
        let queue = state
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        queue
            .messages
            .remove(&message_id)
            .map(|_| ())
            .ok_or_else(|| MessagingError::message_not_found(queue_name, message_id))
    }

    async fn archive(&self, queue_name: &str, message_id: i64) -> MessagingResult<()> {
        let mut state = self.state.lock().await;
        let queue = state
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let stored = queue
            .messages
            .remove(&message_id)
            .ok_or_else(|| MessagingError::message_not_found(queue_name, message_id))?;
        queue.archived.push(stored.message);
        Ok(())
    }
}
