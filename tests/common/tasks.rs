//! Task handlers used by the worker integration tests.

use async_trait::async_trait;
use serde_json::{json, Value};

use base_api::worker::{AsyncTask, TaskError, TaskHandler, TaskResult};

/// Adds the integers of a JSON array
#[derive(Debug, Default)]
pub struct AddTask;

impl TaskHandler for AddTask {
    fn name(&self) -> &str {
        "add"
    }

    fn execute(&self, payload: Value) -> TaskResult<Value> {
        let numbers: Vec<i64> = serde_json::from_value(payload)?;
        Ok(json!(numbers.iter().sum::<i64>()))
    }
}

/// Always fails
#[derive(Debug, Default)]
pub struct FailTask;

impl TaskHandler for FailTask {
    fn name(&self) -> &str {
        "fail"
    }

    fn execute(&self, _payload: Value) -> TaskResult<Value> {
        Err(TaskError::execution("deliberate failure"))
    }
}

/// Panics inside the task body
#[derive(Debug, Default)]
pub struct PanicTask;

impl TaskHandler for PanicTask {
    fn name(&self) -> &str {
        "panic"
    }

    fn execute(&self, _payload: Value) -> TaskResult<Value> {
        panic!("task body panicked");
    }
}

/// Async body that awaits a timer before answering
#[derive(Debug, Default)]
pub struct SlowGreeting;

#[async_trait]
impl AsyncTask for SlowGreeting {
    fn name(&self) -> &str {
        "greet"
    }

    async fn run(&self, payload: Value) -> TaskResult<Value> {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let name = payload["name"].as_str().unwrap_or("world");
        Ok(json!(format!("hello, {name}")))
    }
}
