//! # Periodic Schedules
//!
//! Schedules registered by the configure hooks and emitted by the beat.

use serde_json::Value;
use std::time::Duration;

use super::error::{WorkerError, WorkerResult};
use crate::messaging::{validate_queue_name, TaskMessage};

/// A task enqueued on a fixed interval
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicSchedule {
    pub name: String,
    pub task_name: String,
    pub queue: String,
    pub interval: Duration,
    pub payload: Value,
}

impl PeriodicSchedule {
    pub fn new(
        name: impl Into<String>,
        task_name: impl Into<String>,
        queue: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            task_name: task_name.into(),
            queue: queue.into(),
            interval,
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Message emitted each time the schedule fires
    pub fn task_message(&self) -> TaskMessage {
        TaskMessage::new(&self.task_name, self.payload.clone()).with_origin(&self.name)
    }
}

/// Schedules in registration order
#[derive(Debug, Clone, Default)]
pub struct ScheduleRegistry {
    schedules: Vec<PeriodicSchedule>,
}

impl ScheduleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, schedule: PeriodicSchedule) -> WorkerResult<()> {
        if schedule.interval.is_zero() {
            return Err(WorkerError::InvalidSchedule {
                name: schedule.name,
                reason: "interval must be greater than zero".to_string(),
            });
        }

        if let Err(e) = validate_queue_name(&schedule.queue) {
            return Err(WorkerError::InvalidSchedule {
                name: schedule.name,
                reason: e.to_string(),
            });
        }

        if self.schedules.iter().any(|s| s.name == schedule.name) {
            return Err(WorkerError::DuplicateSchedule(schedule.name));
        }

        self.schedules.push(schedule);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeriodicSchedule> {
        self.schedules.iter()
    }

    /// Distinct target queues, first-registration order
    pub fn queues(&self) -> Vec<String> {
        let mut queues: Vec<String> = Vec::new();
        for schedule in &self.schedules {
            if !queues.contains(&schedule.queue) {
                queues.push(schedule.queue.clone());
            }
        }
        queues
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
