//! # Worker Bootstrap
//!
//! Assembles the worker application: task registry, configure hooks, periodic
//! schedules and the broker / result backend connections.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use base_api::messaging::{InMemoryBroker, QueueResultBackend};
//! use base_api::worker::WorkerApp;
//!
//! # fn example() -> base_api::worker::WorkerResult<()> {
//! let broker = Arc::new(InMemoryBroker::new());
//! let results = Arc::new(QueueResultBackend::new(broker.clone(), "task_results"));
//! let app = WorkerApp::builder().build(broker, results)?;
//! assert!(app.tasks().is_empty());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::beat::{Beat, BeatStats};
use super::error::{WorkerError, WorkerResult};
use super::launcher::WorkerOptions;
use super::pool::{ConsumerSettings, PoolStats, WorkerPool};
use super::schedule::ScheduleRegistry;
use super::task::{TaskHandler, TaskRegistry};
use crate::config::{AppConfig, WorkerConfig};
use crate::database::DatabaseConnection;
use crate::messaging::{MessageBroker, PgmqClient, QueueResultBackend, ResultBackend};

/// Hook run once after the application is configured
pub type ConfigureHook = Box<dyn Fn(&mut ScheduleRegistry) -> WorkerResult<()> + Send + Sync>;

/// Default configure hook; registers no schedules
pub fn setup_periodic_tasks(_schedules: &mut ScheduleRegistry) -> WorkerResult<()> {
    info!("Setting up periodic tasks...");
    info!("Periodic tasks setup completed");
    Ok(())
}

pub struct WorkerAppBuilder {
    tasks: TaskRegistry,
    hooks: Vec<ConfigureHook>,
    settings: WorkerConfig,
}

impl std::fmt::Debug for WorkerAppBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerAppBuilder")
            .field("tasks", &self.tasks)
            .field("hooks", &self.hooks.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Default for WorkerAppBuilder {
    fn default() -> Self {
        Self {
            tasks: TaskRegistry::new(),
            hooks: vec![Box::new(setup_periodic_tasks)],
            settings: WorkerConfig::default(),
        }
    }
}

impl WorkerAppBuilder {
    pub fn settings(mut self, settings: WorkerConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn register_task(mut self, handler: Arc<dyn TaskHandler>) -> WorkerResult<Self> {
        self.tasks.register(handler)?;
        Ok(self)
    }

    /// Attach a hook that runs after [`setup_periodic_tasks`]
    pub fn on_after_configure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ScheduleRegistry) -> WorkerResult<()> + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Run the configure hooks and assemble the application
    pub fn build(
        self,
        broker: Arc<dyn MessageBroker>,
        results: Arc<dyn ResultBackend>,
    ) -> WorkerResult<WorkerApp> {
        let mut schedules = ScheduleRegistry::new();
        for hook in &self.hooks {
            hook(&mut schedules)?;
        }

        info!(
            tasks = ?self.tasks.names(),
            schedules = schedules.len(),
            "Worker application configured"
        );

        Ok(WorkerApp {
            broker,
            results,
            tasks: Arc::new(self.tasks),
            schedules: Arc::new(schedules),
            settings: self.settings,
        })
    }
}

/// Configured worker application, runnable in worker or beat mode
#[derive(Debug)]
pub struct WorkerApp {
    broker: Arc<dyn MessageBroker>,
    results: Arc<dyn ResultBackend>,
    tasks: Arc<TaskRegistry>,
    schedules: Arc<ScheduleRegistry>,
    settings: WorkerConfig,
}

impl WorkerApp {
    pub fn builder() -> WorkerAppBuilder {
        WorkerAppBuilder::default()
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn schedules(&self) -> &ScheduleRegistry {
        &self.schedules
    }

    /// Consume from the option's queues until `shutdown` is cancelled
    pub async fn run_worker(
        &self,
        options: &WorkerOptions,
        shutdown: CancellationToken,
    ) -> WorkerResult<PoolStats> {
        let pool = WorkerPool::new(
            options.node_name.clone(),
            options.queues.clone(),
            options.concurrency,
            ConsumerSettings {
                poll_interval: self.settings.poll_interval(),
                visibility_timeout_seconds: self.settings.visibility_timeout_seconds,
            },
            Arc::clone(&self.broker),
            Arc::clone(&self.results),
            Arc::clone(&self.tasks),
        );

        pool.run(shutdown).await
    }

    /// Emit periodic tasks until `shutdown` is cancelled
    pub async fn run_beat(&self, shutdown: CancellationToken) -> WorkerResult<BeatStats> {
        Beat::new(Arc::clone(&self.broker), Arc::clone(&self.schedules))
            .run(shutdown)
            .await
    }
}

/// Broker and result backend connections for a worker process
#[derive(Debug)]
pub struct WorkerConnections {
    broker_db: DatabaseConnection,
    result_backend_db: DatabaseConnection,
    pub broker: Arc<PgmqClient>,
    pub results: Arc<QueueResultBackend>,
}

impl WorkerConnections {
    /// Open lazy pools to the broker and result backend and create the results queue
    pub async fn connect(config: &AppConfig) -> WorkerResult<Self> {
        let broker_db = DatabaseConnection::connect_lazy(&config.broker_url, &config.database)
            .map_err(|e| WorkerError::Configuration(format!("broker: {e}")))?;
        let result_backend_db =
            DatabaseConnection::connect_lazy(&config.result_backend_url, &config.database)
                .map_err(|e| WorkerError::Configuration(format!("result backend: {e}")))?;

        let broker = Arc::new(PgmqClient::new_with_pool(broker_db.pool().clone()));
        let results = Arc::new(QueueResultBackend::new(
            Arc::new(PgmqClient::new_with_pool(result_backend_db.pool().clone())),
            config.worker.results_queue.clone(),
        ));
        results.initialize().await?;

        Ok(Self {
            broker_db,
            result_backend_db,
            broker,
            results,
        })
    }

    pub async fn close(&self) {
        self.broker_db.close().await;
        self.result_backend_db.close().await;
    }
}
