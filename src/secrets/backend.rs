//! Secret store backend trait.
//!
//! The cache depends only on this capability. Adapters own transport,
//! authentication and region selection, and translate their own failures into
//! [`BackendError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::BackendResult;

/// Type of secret store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretBackendKind {
    /// AWS Secrets Manager
    AwsSecretsManager,
    /// HashiCorp Vault KV v2
    Vault,
    /// `PLATFORMX_SECRET_*` environment variables (development only)
    Env,
    /// Process-local map (tests and local runs)
    Memory,
}

impl SecretBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwsSecretsManager => "aws",
            Self::Vault => "vault",
            Self::Env => "env",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for SecretBackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" | "aws_secrets_manager" => Ok(Self::AwsSecretsManager),
            "vault" => Ok(Self::Vault),
            "env" => Ok(Self::Env),
            "memory" | "in_memory" => Ok(Self::Memory),
            other => Err(format!("Unknown secret backend: {}", other)),
        }
    }
}

impl fmt::Display for SecretBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote (or local) store that can resolve a secret name to its value.
///
/// Implementations must return within bounded time; wrap slow transports in
/// [`super::backends::TimeoutBackend`] when the client library has no deadline
/// of its own.
#[async_trait]
pub trait SecretStoreBackend: Send + Sync + fmt::Debug {
    /// Fetch the current value of `name`.
    ///
    /// # Errors
    ///
    /// - [`super::BackendError::NotFound`] if the store has no such secret
    /// - [`super::BackendError::Unavailable`] for any transport, auth or server failure
    async fn fetch(&self, name: &str) -> BackendResult<String>;

    /// Backend identifier used in logs and health output.
    fn kind(&self) -> SecretBackendKind;

    /// Short name for log fields and metric labels.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Cheap reachability probe for the health subsystem.
    async fn health_check(&self) -> BackendResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("aws".parse::<SecretBackendKind>().unwrap(), SecretBackendKind::AwsSecretsManager);
        assert_eq!("Vault".parse::<SecretBackendKind>().unwrap(), SecretBackendKind::Vault);
        assert_eq!(" env ".parse::<SecretBackendKind>().unwrap(), SecretBackendKind::Env);
        assert_eq!("in_memory".parse::<SecretBackendKind>().unwrap(), SecretBackendKind::Memory);
        assert!("consul".parse::<SecretBackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(SecretBackendKind::AwsSecretsManager.to_string(), "aws");
        assert_eq!(SecretBackendKind::Memory.to_string(), "memory");
    }
}
