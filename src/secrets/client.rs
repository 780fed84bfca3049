//! Secret client façade.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::backend::SecretStoreBackend;
use super::cache::{CacheConfig, SecretCache};
use super::error::{Result, SecretClientError};
use super::types::SecretString;

/// Application-facing entry point for secret lookups.
///
/// Delegates to a shared [`SecretCache`] and translates backend failures into
/// [`SecretClientError`]. There are no retries at this layer; a caller that
/// wants one should check [`SecretClientError::is_retryable`].
///
/// # Security Considerations
///
/// - Values are returned as [`SecretString`], which redacts itself in logs
/// - Secret names are logged, values never are
#[derive(Debug, Clone)]
pub struct SecretClient {
    cache: SecretCache,
}

impl SecretClient {
    pub fn new(cache: SecretCache) -> Self {
        Self { cache }
    }

    /// Build a client with its own cache over `backend`.
    pub fn from_backend(backend: Arc<dyn SecretStoreBackend>, config: CacheConfig) -> Self {
        Self::new(SecretCache::with_config(backend, config))
    }

    /// Retrieve a secret value by name.
    ///
    /// # Errors
    ///
    /// - [`SecretClientError::SecretNotFound`] if the backend does not know `name`
    /// - [`SecretClientError::SecretStoreUnavailable`] if the backend could not be
    ///   reached and no usable cached value exists
    #[instrument(skip(self), fields(backend = %self.cache.backend().kind()))]
    pub async fn get_secret(&self, name: &str) -> Result<SecretString> {
        match self.cache.get(name).await {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = SecretClientError::from_backend(name, e);
                match &err {
                    SecretClientError::SecretNotFound { .. } => {
                        debug!(secret = %name, "Secret not found")
                    }
                    SecretClientError::SecretStoreUnavailable { message, .. } => {
                        warn!(secret = %name, error = %message, "Secret store unavailable")
                    }
                }
                Err(err)
            }
        }
    }

    /// Drop any cached value for `name` and fetch it again.
    pub async fn refresh_secret(&self, name: &str) -> Result<SecretString> {
        self.cache.invalidate(name).await;
        self.get_secret(name).await
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Name of the backend behind the cache, e.g. `"aws"`.
    pub fn backend_name(&self) -> &'static str {
        self.cache.backend().name()
    }

    pub fn cache(&self) -> &SecretCache {
        &self.cache
    }
}
