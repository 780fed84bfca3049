//! # Observability Infrastructure
//!
//! Structured logging, Prometheus metrics and health checking for the
//! PlatformX host.

pub mod health;
pub mod logging;
pub mod metrics;

pub use health::{HealthCheck, HealthChecker, HealthProvider, HealthStatus, SecretStoreHealthProvider};
pub use logging::{init_logging, log_config_info, service_span};
pub use metrics::{init_metrics, MetricsRecorder};

use crate::config::ObservabilityConfig;
use crate::errors::Result;
use ::tracing::{debug, info};

/// Initialize logging and metrics, returning an empty [`HealthChecker`] for
/// the caller to register providers on.
pub fn init_observability(config: &ObservabilityConfig) -> Result<HealthChecker> {
    if !init_logging(config)? {
        debug!("Global tracing subscriber already installed");
    }

    init_metrics(config)?;

    let health_checker = HealthChecker::new();

    info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.json_logging,
        metrics_enabled = config.enable_metrics,
        instance_id = %health_checker.instance_id(),
        "Observability initialized successfully"
    );

    Ok(health_checker)
}
