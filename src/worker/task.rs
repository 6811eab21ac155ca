//! # Task Handlers
//!
//! Synchronous entry point executed by worker consumers, plus the registry
//! that maps task names to handlers. The registry ships empty.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{TaskResult, WorkerError, WorkerResult};

/// Synchronous task body
///
/// Consumers call `execute` on Tokio's blocking pool, so it may block freely.
pub trait TaskHandler: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, payload: Value) -> TaskResult<Value>;
}

/// Asynchronous task body, run through [`super::AsyncTaskAdapter`]
#[async_trait]
pub trait AsyncTask: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, payload: Value) -> TaskResult<Value>;
}

/// Task name to handler mapping
#[derive(Default, Clone)]
pub struct TaskRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.names())
            .finish()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn TaskHandler>) -> WorkerResult<()> {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(WorkerError::DuplicateTask(name));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TaskHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Registered task names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl TaskHandler for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn execute(&self, payload: Value) -> TaskResult<Value> {
            Ok(payload)
        }
    }

    #[test]
    fn test_registry_starts_empty() {
        assert!(TaskRegistry::new().is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = TaskRegistry::new();
        registry.register(Arc::new(Echo)).unwrap();

        let err = registry.register(Arc::new(Echo)).unwrap_err();
        assert!(matches!(err, WorkerError::DuplicateTask(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_executes_handler() {
        let mut registry = TaskRegistry::new();
        registry.register(Arc::new(Echo)).unwrap();

        let handler = registry.get("echo").unwrap();
        assert_eq!(handler.execute(json!({"a": 1})), Ok(json!({"a": 1})));
        assert!(registry.get("missing").is_none());
    }
}
