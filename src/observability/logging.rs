//! # Structured Logging
//!
//! Installs the global `tracing` subscriber and builds the service span that
//! tags every event with deployment identity.
//!
//! In JSON mode each line carries the fields of every enclosing span, so a log search for
//! `environment_name` or `server_name` finds every event from one deployment.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default levels for noisy crates, applied unless the filter names the
/// target explicitly.
const QUIET_TARGETS: &[&str] = &["hyper=warn", "h2=warn", "rustls=warn", "tower_http=info"];

/// Build the filter from `log_level`, which may be a bare level or a full
/// directive list.
pub fn build_env_filter(log_level: &str) -> Result<EnvFilter> {
    let mut directives = log_level.trim().to_string();
    for quiet in QUIET_TARGETS {
        let target = quiet.split('=').next().unwrap_or_default();
        if !names_target(log_level, target) {
            directives.push(',');
            directives.push_str(quiet);
        }
    }

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", log_level, e)))
}

/// Whether a directive in `directives` sets a level for exactly `target`.
fn names_target(directives: &str, target: &str) -> bool {
    directives
        .split(',')
        .filter_map(|directive| directive.trim().split_once('='))
        .any(|(directive_target, _)| directive_target.trim() == target)
}

/// Install the global subscriber. Returns `Ok(false)` if one was already
/// installed (tests, embedding hosts).
pub fn init_logging(config: &ObservabilityConfig) -> Result<bool> {
    let filter = build_env_filter(&config.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logging {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .is_ok()
    } else {
        registry.with(fmt::layer().with_target(true).with_thread_ids(true)).try_init().is_ok()
    };

    Ok(installed)
}

/// Root span for the process, carrying the fields every log line should have.
pub fn service_span(config: &AppConfig) -> Span {
    tracing::info_span!(
        "service",
        environment_name = %config.bootstrap.environment_name,
        application_name = %config.observability.service_name,
        process_id = std::process::id(),
        server_name = config.bootstrap.server_name.as_deref().unwrap_or("unknown"),
        build_number = config.bootstrap.build_number.as_deref().unwrap_or("local"),
    )
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        api_address = %config.api.socket_address(),
        environment = %config.bootstrap.environment_name,
        secrets_backend = %config.secrets.backend,
        secrets_ttl_secs = config.secrets.ttl_seconds,
        stale_policy = %config.secrets.stale_policy,
        cors_origins = config.bootstrap.cors_origins.len(),
        metrics_enabled = %config.observability.enable_metrics,
        "PlatformX host configuration"
    );
}
