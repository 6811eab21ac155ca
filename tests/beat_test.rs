use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use base_api::messaging::{InMemoryBroker, QueueResultBackend, TaskMessage};
use base_api::worker::{BeatStats, PeriodicSchedule, WorkerApp, WorkerAppBuilder};

async fn run_beat_for(
    builder: WorkerAppBuilder,
    broker: Arc<InMemoryBroker>,
    elapsed: Duration,
) -> BeatStats {
    let results = Arc::new(QueueResultBackend::new(broker.clone(), "task_results"));
    let app = Arc::new(builder.build(broker, results).unwrap());
    let shutdown = CancellationToken::new();

    let beat = tokio::spawn({
        let app = Arc::clone(&app);
        let shutdown = shutdown.clone();
        async move { app.run_beat(shutdown).await }
    });

    tokio::time::sleep(elapsed).await;
    shutdown.cancel();
    beat.await.unwrap().unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_beat_without_schedules_emits_nothing() {
    let broker = Arc::new(InMemoryBroker::new());

    let stats = run_beat_for(
        WorkerApp::builder(),
        broker.clone(),
        Duration::from_secs(3600),
    )
    .await;

    assert_eq!(stats, BeatStats::default());
    assert!(broker.is_empty("default").await);
}

#[tokio::test(start_paused = true)]
async fn test_beat_emits_once_per_interval() {
    let broker = Arc::new(InMemoryBroker::new());
    let builder = WorkerApp::builder().on_after_configure(|schedules| {
        schedules.add(
            PeriodicSchedule::new("tick", "cleanup", "default", Duration::from_secs(10))
                .with_payload(json!({"days": 30})),
        )
    });

    let stats = run_beat_for(builder, broker.clone(), Duration::from_secs(35)).await;

    assert_eq!(stats.emitted, 3);
    let payloads = broker.payloads("default").await;
    assert_eq!(payloads.len(), 3);

    let first: TaskMessage = serde_json::from_value(payloads[0].clone()).unwrap();
    assert_eq!(first.task_name, "cleanup");
    assert_eq!(first.origin.as_deref(), Some("tick"));
    assert_eq!(first.payload, json!({"days": 30}));
}

#[tokio::test(start_paused = true)]
async fn test_beat_runs_schedules_independently() {
    let broker = Arc::new(InMemoryBroker::new());
    let builder = WorkerApp::builder().on_after_configure(|schedules| {
        schedules.add(PeriodicSchedule::new(
            "fast",
            "noop",
            "default",
            Duration::from_secs(5),
        ))?;
        schedules.add(PeriodicSchedule::new(
            "slow",
            "noop",
            "reports",
            Duration::from_secs(20),
        ))
    });

    let stats = run_beat_for(builder, broker.clone(), Duration::from_secs(42)).await;

    assert_eq!(broker.len("default").await, 8);
    assert_eq!(broker.len("reports").await, 2);
    assert_eq!(stats.emitted, 10);
}
