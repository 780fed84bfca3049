//! Process-local secret backend.
//!
//! Holds secrets in a concurrent map. Used by tests to stand in for a remote
//! store and by local runs (`PLATFORMX_SECRETS_BACKEND=memory`). Availability
//! and latency can be controlled at runtime to exercise cache behavior.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::secrets::backend::{SecretBackendKind, SecretStoreBackend};
use crate::secrets::error::{BackendError, BackendResult};

/// In-memory secret store with fetch counting.
#[derive(Debug)]
pub struct InMemorySecretBackend {
    secrets: DashMap<String, String>,
    available: AtomicBool,
    latency: Duration,
    fetches: AtomicUsize,
}

impl Default for InMemorySecretBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySecretBackend {
    pub fn new() -> Self {
        Self {
            secrets: DashMap::new(),
            available: AtomicBool::new(true),
            latency: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Builder-style seed for a single secret.
    pub fn with_secret(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }

    /// Delay every fetch by `latency` (uses the tokio clock).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.secrets.remove(name).map(|(_, value)| value)
    }

    /// Toggle whether fetches succeed or report `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `fetch` calls received so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStoreBackend for InMemorySecretBackend {
    async fn fetch(&self, name: &str) -> BackendResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::unavailable("in-memory secret store is marked unavailable"));
        }

        self.secrets
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BackendError::not_found(name))
    }

    fn kind(&self) -> SecretBackendKind {
        SecretBackendKind::Memory
    }

    async fn health_check(&self) -> BackendResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::unavailable("in-memory secret store is marked unavailable"))
        }
    }
}
