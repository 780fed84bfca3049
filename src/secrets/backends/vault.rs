//! Vault secret backend implementation
//!
//! Fetches secrets from a HashiCorp Vault KV v2 engine. The secret name is the
//! path within the configured mount.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use crate::errors::{Error, Result};
use crate::secrets::backend::{SecretBackendKind, SecretStoreBackend};
use crate::secrets::error::{BackendError, BackendResult};

/// Configuration for Vault backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultBackendConfig {
    /// Vault server address
    pub address: String,
    /// Vault authentication token
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Vault namespace (for Enterprise)
    pub namespace: Option<String>,
    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_kv_mount")]
    pub kv_mount_path: String,
}

pub(crate) fn default_kv_mount() -> String {
    "secret".to_string()
}

impl VaultBackendConfig {
    /// Load configuration from environment variables
    ///
    /// Uses:
    /// - `PLATFORMX_VAULT_ADDR` or `VAULT_ADDR`
    /// - `PLATFORMX_VAULT_TOKEN` or `VAULT_TOKEN`
    /// - `PLATFORMX_VAULT_NAMESPACE` or `VAULT_NAMESPACE`
    /// - `PLATFORMX_VAULT_KV_MOUNT` (default: "secret")
    ///
    /// Returns `None` when no address is set.
    pub fn from_env() -> Option<Self> {
        let address =
            std::env::var("PLATFORMX_VAULT_ADDR").or_else(|_| std::env::var("VAULT_ADDR")).ok()?;

        let token =
            std::env::var("PLATFORMX_VAULT_TOKEN").or_else(|_| std::env::var("VAULT_TOKEN")).ok();

        let namespace = std::env::var("PLATFORMX_VAULT_NAMESPACE")
            .or_else(|_| std::env::var("VAULT_NAMESPACE"))
            .ok();

        let kv_mount_path =
            std::env::var("PLATFORMX_VAULT_KV_MOUNT").unwrap_or_else(|_| default_kv_mount());

        Some(Self { address, token, namespace, kv_mount_path })
    }
}

/// HashiCorp Vault secret backend
///
/// A secret stored at `<mount>/<name>` is read as a map. The returned value is,
/// in order of preference:
///
/// 1. the `value` field, when it is a string
/// 2. the only field, when the map has exactly one string field
/// 3. the whole map serialized as JSON
pub struct VaultSecretBackend {
    client: VaultClient,
    kv_mount_path: String,
}

impl std::fmt::Debug for VaultSecretBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretBackend")
            .field("kv_mount_path", &self.kv_mount_path)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultSecretBackend {
    /// Create a new Vault backend with the given configuration
    pub fn new(config: VaultBackendConfig) -> Result<Self> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token);
        }

        if let Some(ref namespace) = config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder
            .build()
            .map_err(|e| Error::config(format!("Invalid Vault backend configuration: {}", e)))?;

        let client = VaultClient::new(settings)
            .map_err(|e| Error::config(format!("Failed to create Vault client: {}", e)))?;

        info!(address = %config.address, kv_mount = %config.kv_mount_path, "Initialized Vault secret backend");

        Ok(Self { client, kv_mount_path: config.kv_mount_path })
    }
}

/// Pick the secret value out of a KV v2 data map.
pub(crate) fn extract_secret_value(data: HashMap<String, serde_json::Value>) -> String {
    if let Some(value) = data.get("value").and_then(|v| v.as_str()) {
        return value.to_string();
    }

    if data.len() == 1 {
        if let Some(value) = data.values().next().and_then(|v| v.as_str()) {
            return value.to_string();
        }
    }

    serde_json::Value::Object(data.into_iter().collect()).to_string()
}

fn map_client_error(name: &str, err: ClientError) -> BackendError {
    match err {
        ClientError::APIError { code: 404, .. } => BackendError::not_found(name),
        other => BackendError::unavailable(format!("Vault request failed: {}", other)),
    }
}

#[async_trait]
impl SecretStoreBackend for VaultSecretBackend {
    async fn fetch(&self, name: &str) -> BackendResult<String> {
        debug!(secret = %name, kv_mount = %self.kv_mount_path, "Fetching secret from Vault");

        let data: HashMap<String, serde_json::Value> =
            kv2::read(&self.client, &self.kv_mount_path, name).await.map_err(|e| {
                let mapped = map_client_error(name, e);
                if let BackendError::Unavailable { ref message } = mapped {
                    error!(secret = %name, error = %message, "Failed to fetch secret from Vault");
                }
                mapped
            })?;

        Ok(extract_secret_value(data))
    }

    fn kind(&self) -> SecretBackendKind {
        SecretBackendKind::Vault
    }

    async fn health_check(&self) -> BackendResult<()> {
        vaultrs::sys::health(&self.client)
            .await
            .map_err(|e| BackendError::unavailable(format!("Vault health check failed: {}", e)))?;
        Ok(())
    }
}
