//! # Configuration Settings
//!
//! Defines the configuration structure for the PlatformX service host. Every
//! section is read from environment variables; see each `from_env` for the
//! names and defaults.

use crate::errors::{Error, Result};
use crate::secrets::backends::VaultBackendConfig;
use crate::secrets::{CacheConfig, SecretBackendKind, StalePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Region used for AWS Secrets Manager when none is configured.
pub const DEFAULT_AWS_REGION: &str = "ap-southeast-2";

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "y"))
        .unwrap_or(default)
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| Error::config(format!("Invalid {} '{}': {}", name, raw, e))),
        None => Ok(default),
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// Deployment identity and cross-cutting switches
    #[validate(nested)]
    pub bootstrap: BootstrapConfig,

    /// HTTP API server configuration
    #[validate(nested)]
    pub api: ApiServerConfig,

    /// OpenAPI document metadata
    #[validate(nested)]
    pub openapi: OpenApiInfoConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,

    /// Secret retrieval configuration
    #[validate(nested)]
    pub secrets: SecretsConfig,
}

impl AppConfig {
    /// Read every section from the environment.
    pub fn from_env() -> Result<Self> {
        let bootstrap = BootstrapConfig::from_env();
        let api = ApiServerConfig::from_env()?;
        let openapi = OpenApiInfoConfig::from_env();
        let observability = ObservabilityConfig::from_env()?;
        let secrets = SecretsConfig::from_env(&bootstrap)?;

        Ok(Self { bootstrap, api, openapi, observability, secrets })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        self.validate_custom()?;

        Ok(())
    }

    /// Checks that span sections or depend on enum values
    fn validate_custom(&self) -> Result<()> {
        if self.observability.enable_metrics && self.observability.metrics_port == self.api.port {
            return Err(Error::validation("API server and metrics ports cannot be the same"));
        }

        if self.secrets.backend == SecretBackendKind::Vault && self.secrets.vault.is_none() {
            return Err(Error::validation(
                "Vault secret backend requires PLATFORMX_VAULT_ADDR or VAULT_ADDR",
            ));
        }

        Ok(())
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Test => "Test",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    /// Lenient parse: unknown or empty names fall back to `Development`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Self::Test,
            "staging" => Self::Staging,
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment identity shared by every PlatformX service
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct BootstrapConfig {
    pub environment_name: Environment,
    pub service_name: Option<String>,
    pub prefix: Option<String>,
    pub portal_name: Option<String>,
    pub layer: Option<String>,
    pub aws_region: Option<String>,
    pub build_number: Option<String>,
    pub server_name: Option<String>,
    pub container_type: Option<String>,

    /// Allowed CORS origins; empty disables the CORS layer
    pub cors_origins: Vec<String>,

    pub log_messages: bool,
    pub log_warnings: bool,
    pub log_errors: bool,
}

impl BootstrapConfig {
    pub fn from_env() -> Self {
        let environment_name = env_var("ENVIRONMENT_NAME")
            .or_else(|| env_var("EnvironmentName"))
            .map(|name| Environment::parse_lenient(&name))
            .unwrap_or_default();

        let cors_origins = env_var("CorsOrigins")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let yes = |name: &str| std::env::var(name).map(|v| v == "Y").unwrap_or(false);

        Self {
            environment_name,
            service_name: env_var("ServiceName"),
            prefix: env_var("Prefix"),
            portal_name: env_var("PortalName"),
            layer: env_var("Layer"),
            aws_region: env_var("AwsRegion"),
            build_number: env_var("BuildNumber"),
            server_name: env_var("ServerName"),
            container_type: env_var("ContainerType"),
            cors_origins,
            log_messages: yes("LogMessages"),
            log_warnings: yes("LogWarnings"),
            log_errors: yes("LogErrors"),
        }
    }
}

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Bind address cannot be empty"))]
    pub bind_address: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl ApiServerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            bind_address: env_var("PLATFORMX_API_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env_parse("PLATFORMX_API_PORT", defaults.port)?,
        })
    }

    /// Get the server bind address
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// OpenAPI document metadata
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenApiInfoConfig {
    #[validate(length(min = 1, message = "OpenAPI title cannot be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "OpenAPI version cannot be empty"))]
    pub version: String,

    pub description: Option<String>,
}

impl Default for OpenApiInfoConfig {
    fn default() -> Self {
        Self {
            title: "PlatformX API".to_string(),
            version: "v1".to_string(),
            description: None,
        }
    }
}

impl OpenApiInfoConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            title: env_var("OPENAPI_TITLE").unwrap_or(defaults.title),
            version: env_var("OPENAPI_VERSION").unwrap_or(defaults.version),
            description: env_var("OPENAPI_DESCRIPTION"),
        }
    }
}

/// Observability configuration for logging, metrics, and health checks
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Metrics server port (0 = disabled)
    pub metrics_port: u16,

    /// Service name attached to logs and metrics
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enable_metrics: false,
            metrics_port: 9090,
            service_name: "platformx".to_string(),
            log_level: "info".to_string(),
            json_logging: true,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            enable_metrics: env_flag("PLATFORMX_ENABLE_METRICS", defaults.enable_metrics),
            metrics_port: env_parse("PLATFORMX_METRICS_PORT", defaults.metrics_port)?,
            service_name: env_var("APPLICATION_NAME").unwrap_or(defaults.service_name),
            log_level: env_var("PLATFORMX_LOG_LEVEL")
                .or_else(|| env_var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logging: env_flag("PLATFORMX_JSON_LOGGING", defaults.json_logging),
        })
    }

    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}

/// Secret store selection and cache behavior
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SecretsConfig {
    /// Which backend serves secrets
    pub backend: SecretBackendKind,

    /// Maximum age of a cached secret, in seconds
    #[validate(range(min = 1, message = "Secret TTL must be at least 1 second"))]
    pub ttl_seconds: u64,

    /// What to do with an expired entry when the backend is unavailable
    pub stale_policy: StalePolicy,

    /// Deadline for a single backend fetch, in seconds
    #[validate(range(min = 1, max = 300, message = "Fetch timeout must be between 1 and 300 seconds"))]
    pub fetch_timeout_seconds: u64,

    /// Vault connection, when configured
    pub vault: Option<VaultBackendConfig>,

    /// AWS region for Secrets Manager
    #[validate(length(min = 1, message = "AWS region cannot be empty"))]
    pub aws_region: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretBackendKind::Env,
            ttl_seconds: 300,
            stale_policy: StalePolicy::FailClosed,
            fetch_timeout_seconds: 10,
            vault: None,
            aws_region: DEFAULT_AWS_REGION.to_string(),
        }
    }
}

impl SecretsConfig {
    /// Read secret settings; the AWS region falls back to the bootstrap
    /// `AwsRegion` before the built-in default.
    pub fn from_env(bootstrap: &BootstrapConfig) -> Result<Self> {
        let defaults = Self::default();

        let backend = match env_var("PLATFORMX_SECRETS_BACKEND") {
            Some(raw) => raw.parse::<SecretBackendKind>().map_err(Error::config)?,
            None => defaults.backend,
        };

        let stale_policy = match env_var("PLATFORMX_SECRETS_STALE_POLICY") {
            Some(raw) => raw.parse::<StalePolicy>().map_err(Error::config)?,
            None => defaults.stale_policy,
        };

        let aws_region = env_var("PLATFORMX_AWS_REGION")
            .or_else(|| bootstrap.aws_region.clone())
            .unwrap_or(defaults.aws_region);

        Ok(Self {
            backend,
            ttl_seconds: env_parse("PLATFORMX_SECRETS_TTL_SECONDS", defaults.ttl_seconds)?,
            stale_policy,
            fetch_timeout_seconds: env_parse(
                "PLATFORMX_SECRETS_FETCH_TIMEOUT_SECONDS",
                defaults.fetch_timeout_seconds,
            )?,
            vault: VaultBackendConfig::from_env(),
            aws_region,
        })
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig { ttl: self.ttl(), stale_policy: self.stale_policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_parse_lenient() {
        assert_eq!(Environment::parse_lenient("Production"), Environment::Production);
        assert_eq!(Environment::parse_lenient("staging"), Environment::Staging);
        assert_eq!(Environment::parse_lenient("TEST"), Environment::Test);
        assert_eq!(Environment::parse_lenient("qa-7"), Environment::Development);
        assert_eq!(Environment::parse_lenient(""), Environment::Development);
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_api_server_socket_address() {
        let config = ApiServerConfig { bind_address: "127.0.0.1".to_string(), port: 9000 };
        assert_eq!(config.socket_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = AppConfig {
            secrets: SecretsConfig { ttl_seconds: 0, ..Default::default() },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Secret TTL"));
    }

    #[test]
    fn test_vault_backend_requires_address() {
        let config = AppConfig {
            secrets: SecretsConfig {
                backend: SecretBackendKind::Vault,
                vault: None,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metrics_port_conflict() {
        let config = AppConfig {
            observability: ObservabilityConfig {
                enable_metrics: true,
                metrics_port: 8080,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secrets_cache_config() {
        let config = SecretsConfig {
            ttl_seconds: 2,
            stale_policy: StalePolicy::FailOpen,
            ..Default::default()
        };
        let cache = config.cache_config();
        assert_eq!(cache.ttl, Duration::from_secs(2));
        assert_eq!(cache.stale_policy, StalePolicy::FailOpen);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_metrics_bind_address() {
        let config = ObservabilityConfig { metrics_port: 0, ..Default::default() };
        assert_eq!(config.metrics_bind_address(), None);

        let config = ObservabilityConfig { metrics_port: 9100, ..Default::default() };
        assert_eq!(config.metrics_bind_address(), Some("0.0.0.0:9100".to_string()));
    }
}
