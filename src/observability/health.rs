//! # Health Checking
//!
//! Provides health checking for the host's dependencies. The only dependency
//! with real failure modes is the secret store, reported by
//! [`SecretStoreHealthProvider`].

use crate::errors::Result;
use crate::secrets::SecretClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Health status for a component
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    /// Component is healthy and operational
    Healthy,
    /// Component is degraded but still functional
    Degraded { message: String },
    /// Component is unhealthy and not functional
    Unhealthy { message: String },
}

impl HealthStatus {
    /// Check if the status is healthy
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Check if the status is operational (healthy or degraded)
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded { .. })
    }

    /// Get the status message
    pub fn message(&self) -> Option<&str> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::Degraded { message } | HealthStatus::Unhealthy { message } => {
                Some(message)
            }
        }
    }

    /// Lower-case label used in JSON responses
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded { .. } => "degraded",
            HealthStatus::Unhealthy { .. } => "unhealthy",
        }
    }
}

/// Health check result for a component
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Component name
    pub component: String,
    /// Health status
    pub status: HealthStatus,
    /// Last check timestamp
    pub last_check: chrono::DateTime<chrono::Utc>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl HealthCheck {
    pub fn new(component: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            component: component.into(),
            status,
            last_check: chrono::Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn healthy(component: impl Into<String>) -> Self {
        Self::new(component, HealthStatus::Healthy)
    }

    pub fn degraded(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(component, HealthStatus::Degraded { message: message.into() })
    }

    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(component, HealthStatus::Unhealthy { message: message.into() })
    }

    /// Add metadata to the health check
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Component that provides health checking functionality
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Perform a health check for this component
    async fn health_check(&self) -> Result<HealthCheck>;
}

/// Central health checker that manages health checks for all components
#[derive(Clone)]
pub struct HealthChecker {
    providers: Arc<RwLock<HashMap<String, Arc<dyn HealthProvider>>>>,
    cache: Arc<RwLock<HashMap<String, HealthCheck>>>,
    instance_id: String,
}

impl std::fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthChecker").field("instance_id", &self.instance_id).finish()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            cache: Arc::new(RwLock::new(HashMap::new())),
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Register a health provider under `name`, replacing any previous one.
    pub async fn register_provider<S: Into<String>>(
        &self,
        name: S,
        provider: Arc<dyn HealthProvider>,
    ) {
        self.providers.write().await.insert(name.into(), provider);
    }

    /// Run every registered provider. A provider that errors is reported as
    /// unhealthy rather than failing the whole check.
    pub async fn check_all(&self) -> HashMap<String, HealthCheck> {
        let providers: Vec<(String, Arc<dyn HealthProvider>)> = self
            .providers
            .read()
            .await
            .iter()
            .map(|(name, provider)| (name.clone(), Arc::clone(provider)))
            .collect();

        let mut results = HashMap::new();
        for (name, provider) in providers {
            let check = match provider.health_check().await {
                Ok(check) => check,
                Err(e) => HealthCheck::unhealthy(name.clone(), format!("Health check failed: {}", e)),
            };
            results.insert(name, check);
        }

        self.cache.write().await.extend(results.clone());

        results
    }

    /// Fold individual checks into one status.
    pub fn summarize(checks: &HashMap<String, HealthCheck>) -> HealthStatus {
        if checks.is_empty() {
            return HealthStatus::Degraded { message: "No health providers registered".to_string() };
        }

        let unhealthy_count =
            checks.values().filter(|c| matches!(c.status, HealthStatus::Unhealthy { .. })).count();
        let degraded_count =
            checks.values().filter(|c| matches!(c.status, HealthStatus::Degraded { .. })).count();

        if unhealthy_count > 0 {
            HealthStatus::Unhealthy {
                message: format!(
                    "{} unhealthy, {} degraded out of {} components",
                    unhealthy_count,
                    degraded_count,
                    checks.len()
                ),
            }
        } else if degraded_count > 0 {
            HealthStatus::Degraded {
                message: format!("{} degraded out of {} components", degraded_count, checks.len()),
            }
        } else {
            HealthStatus::Healthy
        }
    }

    /// Get the overall health status
    pub async fn overall_status(&self) -> HealthStatus {
        Self::summarize(&self.check_all().await)
    }

    /// Check if the system is ready to serve traffic
    pub async fn is_ready(&self) -> bool {
        self.overall_status().await.is_operational()
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Results of the most recent [`check_all`](Self::check_all)
    pub async fn get_cached_checks(&self) -> HashMap<String, HealthCheck> {
        self.cache.read().await.clone()
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports whether the secret store behind a [`SecretClient`] is reachable.
pub struct SecretStoreHealthProvider {
    client: SecretClient,
}

impl SecretStoreHealthProvider {
    pub fn new(client: SecretClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthProvider for SecretStoreHealthProvider {
    async fn health_check(&self) -> Result<HealthCheck> {
        let start = std::time::Instant::now();
        let backend = self.client.backend_name();
        let cached = self.client.cache().len().await;

        let check = match self.client.cache().backend().health_check().await {
            Ok(()) => HealthCheck::healthy("secret_store"),
            Err(e) => HealthCheck::unhealthy("secret_store", e.to_string()),
        };

        Ok(check
            .with_metadata("backend", backend)
            .with_metadata("cached_entries", cached.to_string())
            .with_metadata("response_time_ms", start.elapsed().as_millis().to_string()))
    }
}
