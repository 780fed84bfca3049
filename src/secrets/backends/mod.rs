//! Secret store adapters
//!
//! Each adapter implements [`SecretStoreBackend`] and owns its own protocol
//! detail. [`build_backend`] selects one from configuration.
//!
//! ## Supported Backends
//!
//! - **AWS Secrets Manager**: (Optional feature `aws`)
//! - **Vault**: HashiCorp Vault KV v2 engine
//! - **Env**: `PLATFORMX_SECRET_*` variables, development only
//! - **Memory**: process-local map for tests and local runs

#[cfg(feature = "aws")]
pub mod aws;
pub mod env;
pub mod memory;
pub mod timeout;
pub mod vault;

#[cfg(feature = "aws")]
pub use aws::AwsSecretsManagerBackend;
pub use env::EnvVarSecretBackend;
pub use memory::InMemorySecretBackend;
pub use timeout::{TimeoutBackend, DEFAULT_FETCH_TIMEOUT};
pub use vault::{VaultBackendConfig, VaultSecretBackend};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SecretsConfig;
use crate::errors::{Error, Result};
use crate::secrets::backend::{SecretBackendKind, SecretStoreBackend};

/// Build the configured backend, wrapped in a [`TimeoutBackend`] so every
/// fetch fails within `fetch_timeout_seconds`.
pub async fn build_backend(config: &SecretsConfig) -> Result<Arc<dyn SecretStoreBackend>> {
    let backend: Arc<dyn SecretStoreBackend> = match config.backend {
        SecretBackendKind::AwsSecretsManager => build_aws_backend(config).await?,
        SecretBackendKind::Vault => {
            let vault = config.vault.clone().ok_or_else(|| {
                Error::config("Vault secret backend selected but PLATFORMX_VAULT_ADDR is not set")
            })?;
            Arc::new(VaultSecretBackend::new(vault)?)
        }
        SecretBackendKind::Env => {
            warn!("Using environment variable secret backend; not suitable for production");
            Arc::new(EnvVarSecretBackend::new())
        }
        SecretBackendKind::Memory => {
            warn!("Using in-memory secret backend; secrets must be inserted at runtime");
            Arc::new(InMemorySecretBackend::new())
        }
    };

    info!(
        backend = %backend.kind(),
        fetch_timeout_secs = config.fetch_timeout().as_secs(),
        "Secret store backend ready"
    );

    Ok(Arc::new(TimeoutBackend::new(backend, config.fetch_timeout())))
}

#[cfg(feature = "aws")]
async fn build_aws_backend(config: &SecretsConfig) -> Result<Arc<dyn SecretStoreBackend>> {
    Ok(Arc::new(AwsSecretsManagerBackend::new(config.aws_region.clone()).await))
}

#[cfg(not(feature = "aws"))]
async fn build_aws_backend(_config: &SecretsConfig) -> Result<Arc<dyn SecretStoreBackend>> {
    Err(Error::config(
        "AWS Secrets Manager backend requires building with `--features aws`",
    ))
}
