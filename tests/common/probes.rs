//! Database probes standing in for a live PostgreSQL.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use base_api::error::{BaseApiError, Result};
use base_api::health::DatabaseProbe;

/// Returns the same value on every probe and counts calls
#[derive(Debug, Default)]
pub struct StaticProbe {
    value: i64,
    calls: AtomicUsize,
}

impl StaticProbe {
    pub fn returning(value: i64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseProbe for StaticProbe {
    async fn probe(&self) -> Result<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

/// Fails every probe the way an unreachable database would
#[derive(Debug, Default)]
pub struct FailingProbe;

#[async_trait]
impl DatabaseProbe for FailingProbe {
    async fn probe(&self) -> Result<i64> {
        Err(BaseApiError::DatabaseError(
            "error connecting to server: Connection refused".to_string(),
        ))
    }
}
