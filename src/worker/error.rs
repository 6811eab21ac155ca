//! Worker-specific error types

use thiserror::Error;

use crate::messaging::MessagingError;

/// Worker foundation error type
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid launch arguments: {0}")]
    InvalidArguments(String),

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Task already registered: {0}")]
    DuplicateTask(String),

    #[error("Schedule already registered: {0}")]
    DuplicateSchedule(String),

    #[error("Invalid schedule {name}: {reason}")]
    InvalidSchedule { name: String, reason: String },

    #[error("Configure hook failed: {0}")]
    Hook(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Failure of a single task body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Task failed: {0}")]
    Execution(String),

    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Bridge runtime unavailable: {0}")]
    Runtime(String),
}

impl TaskError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Result type alias for WorkerError
pub type WorkerResult<T> = std::result::Result<T, WorkerError>;

/// Result type alias for task bodies
pub type TaskResult<T> = std::result::Result<T, TaskError>;
