//! Error types for secret retrieval.
//!
//! Two layers, two enums:
//! - [`BackendError`] is what a secret store adapter reports to the cache.
//! - [`SecretClientError`] is what application code sees from [`super::SecretClient`].
//!
//! Both are deliberately small: every failure is attributable to "the name does
//! not exist" or "the store could not answer". Adapter-specific errors are
//! translated into one of these at the adapter seam.

use thiserror::Error;

/// Result type for backend fetches and cache lookups.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Result type for secret client operations.
pub type Result<T> = std::result::Result<T, SecretClientError>;

/// Failure reported by a secret store backend.
///
/// `Clone` because a single in-flight fetch result is handed to every caller
/// that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend has no secret with this name.
    #[error("Secret not found: {name}")]
    NotFound { name: String },

    /// The backend could not be reached or failed to answer.
    #[error("Secret store unavailable: {message}")]
    Unavailable { message: String },
}

impl BackendError {
    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// Errors returned by [`super::SecretClient`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretClientError {
    /// The caller asked for a name the backend does not have. Not retried.
    #[error("Secret not found: {name}")]
    SecretNotFound { name: String },

    /// The backend could not be reached and no usable cached value exists.
    #[error("Secret store unavailable while fetching '{name}': {message}")]
    SecretStoreUnavailable { name: String, message: String },
}

impl SecretClientError {
    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::SecretNotFound { name: name.into() }
    }

    /// Create an unavailable error.
    pub fn unavailable(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretStoreUnavailable { name: name.into(), message: message.into() }
    }

    /// Translate a backend failure for `name` into the client taxonomy.
    pub fn from_backend(name: &str, error: BackendError) -> Self {
        match error {
            BackendError::NotFound { .. } => Self::not_found(name),
            BackendError::Unavailable { message } => Self::unavailable(name, message),
        }
    }

    /// Whether a caller may reasonably retry the operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SecretStoreUnavailable { .. })
    }
}
