//! Deadline wrapper for secret backends.
//!
//! The cache never times out a fetch itself; it relies on the adapter to fail
//! within bounded time. `TimeoutBackend` gives any backend that guarantee by
//! turning an overrunning fetch into [`BackendError::Unavailable`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::secrets::backend::{SecretBackendKind, SecretStoreBackend};
use crate::secrets::error::{BackendError, BackendResult};

/// Default deadline for a single backend fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct TimeoutBackend {
    inner: Arc<dyn SecretStoreBackend>,
    timeout: Duration,
}

impl TimeoutBackend {
    pub fn new(inner: Arc<dyn SecretStoreBackend>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl SecretStoreBackend for TimeoutBackend {
    async fn fetch(&self, name: &str) -> BackendResult<String> {
        match tokio::time::timeout(self.timeout, self.inner.fetch(name)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    secret = %name,
                    backend = %self.inner.kind(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Secret fetch timed out"
                );
                Err(BackendError::unavailable(format!(
                    "fetch of '{}' from {} timed out after {}ms",
                    name,
                    self.inner.kind(),
                    self.timeout.as_millis()
                )))
            }
        }
    }

    fn kind(&self) -> SecretBackendKind {
        self.inner.kind()
    }

    async fn health_check(&self) -> BackendResult<()> {
        tokio::time::timeout(self.timeout, self.inner.health_check())
            .await
            .map_err(|_| BackendError::unavailable("health check timed out"))?
    }
}
