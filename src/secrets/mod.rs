//! Secret retrieval with a bounded-staleness cache.
//!
//! # Architecture
//!
//! ```text
//! SecretClient  ->  SecretCache  ->  SecretStoreBackend (on miss or expiry)
//! ```
//!
//! - [`SecretStoreBackend`] is the adapter seam. Adapters live in [`backends`]
//!   and translate their own failures into [`BackendError`].
//! - [`SecretCache`] keeps one entry per secret name for at most the configured
//!   TTL and merges concurrent misses for the same name into a single fetch.
//! - [`SecretClient`] is what application code holds. It maps backend failures
//!   to [`SecretClientError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use platformx::secrets::{backends::InMemorySecretBackend, CacheConfig, SecretClient};
//!
//! let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "hunter2"));
//! let client = SecretClient::from_backend(backend, CacheConfig::default());
//!
//! let password = client.get_secret("db-pw").await?;
//! connect(password.expose_secret());
//! ```

pub mod backend;
pub mod backends;
pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use backend::{SecretBackendKind, SecretStoreBackend};
pub use cache::{CacheConfig, CacheStats, SecretCache, StalePolicy, DEFAULT_SECRET_TTL};
pub use client::SecretClient;
pub use error::{BackendError, BackendResult, SecretClientError};
pub use types::SecretString;
