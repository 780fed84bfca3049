//! AWS Secrets Manager backend.
//!
//! Only compiled with the `aws` feature. Credentials come from the standard
//! AWS provider chain (environment, profile, instance role).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::Client;
use tracing::{debug, info, warn};

use crate::secrets::backend::{SecretBackendKind, SecretStoreBackend};
use crate::secrets::error::{BackendError, BackendResult};

pub struct AwsSecretsManagerBackend {
    client: Client,
    region: String,
}

impl std::fmt::Debug for AwsSecretsManagerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManagerBackend")
            .field("region", &self.region)
            .field("client", &"[SecretsManagerClient]")
            .finish()
    }
}

impl AwsSecretsManagerBackend {
    pub async fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;

        info!(region = %region, "Initialized AWS Secrets Manager backend");

        Self { client: Client::new(&sdk_config), region }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl SecretStoreBackend for AwsSecretsManagerBackend {
    async fn fetch(&self, name: &str) -> BackendResult<String> {
        debug!(secret = %name, region = %self.region, "Fetching secret from AWS Secrets Manager");

        let response =
            self.client.get_secret_value().secret_id(name).send().await.map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|service| service.is_resource_not_found_exception())
                    .unwrap_or(false);
                if not_found {
                    BackendError::not_found(name)
                } else {
                    BackendError::unavailable(format!("AWS Secrets Manager error: {}", e))
                }
            })?;

        if let Some(value) = response.secret_string() {
            return Ok(value.to_string());
        }

        match response.secret_binary() {
            Some(blob) => String::from_utf8(blob.as_ref().to_vec()).map_err(|_| {
                BackendError::unavailable(format!("secret '{}' holds non UTF-8 binary data", name))
            }),
            None => Err(BackendError::unavailable(format!("secret '{}' has no value", name))),
        }
    }

    fn kind(&self) -> SecretBackendKind {
        SecretBackendKind::AwsSecretsManager
    }

    async fn health_check(&self) -> BackendResult<()> {
        self.client.list_secrets().max_results(1).send().await.map_err(|e| {
            warn!(error = %e, "AWS Secrets Manager health check failed");
            BackendError::unavailable(format!("AWS Secrets Manager health check failed: {}", e))
        })?;
        Ok(())
    }
}
