//! # Beat
//!
//! Single sequential loop that enqueues a [`crate::messaging::TaskMessage`] for
//! each registered schedule whenever its interval elapses. The first emission
//! of a schedule happens one interval after start. A late loop reschedules from
//! the current time instead of emitting a burst.

use std::sync::Arc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::error::WorkerResult;
use super::schedule::ScheduleRegistry;
use crate::messaging::MessageBroker;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BeatStats {
    pub emitted: u64,
    pub send_failures: u64,
}

#[derive(Debug)]
pub struct Beat {
    broker: Arc<dyn MessageBroker>,
    schedules: Arc<ScheduleRegistry>,
}

impl Beat {
    pub fn new(broker: Arc<dyn MessageBroker>, schedules: Arc<ScheduleRegistry>) -> Self {
        Self { broker, schedules }
    }

    pub async fn run(&self, shutdown: CancellationToken) -> WorkerResult<BeatStats> {
        let mut stats = BeatStats::default();

        for queue in self.schedules.queues() {
            self.broker.create_queue(&queue).await?;
        }

        if self.schedules.is_empty() {
            info!("No periodic schedules registered; beat idle until shutdown");
            shutdown.cancelled().await;
            return Ok(stats);
        }

        info!(schedules = self.schedules.len(), "Beat started");

        let started = Instant::now();
        let mut due: Vec<Instant> = self
            .schedules
            .iter()
            .map(|schedule| started + schedule.interval)
            .collect();

        loop {
            let Some(next) = due.iter().copied().min() else {
                break;
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep_until(next) => {}
            }

            let now = Instant::now();
            for (schedule, due_at) in self.schedules.iter().zip(due.iter_mut()) {
                if *due_at > now {
                    continue;
                }

                let message = schedule.task_message();
                match self.broker.send_task(&schedule.queue, &message).await {
                    Ok(message_id) => {
                        stats.emitted += 1;
                        debug!(
                            schedule = %schedule.name,
                            queue = %schedule.queue,
                            message_id,
                            "Periodic task enqueued"
                        );
                    }
                    Err(e) => {
                        stats.send_failures += 1;
                        error!(schedule = %schedule.name, error = %e, "Failed to enqueue periodic task");
                    }
                }

                let following = *due_at + schedule.interval;
                *due_at = if following <= now {
                    now + schedule.interval
                } else {
                    following
                };
            }
        }

        info!(emitted = stats.emitted, "Beat stopped");
        Ok(stats)
    }
}
