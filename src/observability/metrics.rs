//! # Metrics Collection
//!
//! Prometheus metrics for the secret cache and HTTP host. Recording functions
//! are no-ops until [`init_metrics`] installs the exporter.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use ::tracing::{info, warn};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;

/// Metrics recorder that tracks application metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }

    pub fn record_secret_cache_hit(&self) {
        counter!("secret_cache_hits_total").increment(1);
    }

    pub fn record_secret_cache_miss(&self) {
        counter!("secret_cache_misses_total").increment(1);
    }

    /// Record a completed backend fetch with its outcome
    /// (`success`, `not_found`, `unavailable`).
    pub fn record_secret_fetch(&self, backend: &str, outcome: &str, duration: f64) {
        let labels = [("backend", backend.to_string()), ("outcome", outcome.to_string())];
        counter!("secret_backend_fetches_total", &labels).increment(1);

        let duration_labels = [("backend", backend.to_string())];
        histogram!("secret_backend_fetch_duration_seconds", &duration_labels).record(duration);
    }

    pub fn record_secret_fetch_coalesced(&self) {
        counter!("secret_cache_coalesced_total").increment(1);
    }

    pub fn record_stale_secret_served(&self) {
        counter!("secret_cache_stale_served_total").increment(1);
    }

    /// Register secret metrics so Prometheus exports them before events occur.
    pub fn register_secret_metrics(&self) {
        describe_counter!(
            "secret_cache_hits_total",
            Unit::Count,
            "Secret lookups answered from a fresh cache entry"
        );
        describe_counter!(
            "secret_cache_misses_total",
            Unit::Count,
            "Secret lookups that found no fresh cache entry"
        );
        describe_counter!(
            "secret_backend_fetches_total",
            Unit::Count,
            "Secret store fetches by backend and outcome"
        );
        describe_counter!(
            "secret_cache_coalesced_total",
            Unit::Count,
            "Cache misses that joined a fetch already in flight"
        );
        describe_counter!(
            "secret_cache_stale_served_total",
            Unit::Count,
            "Expired secrets served because the store was unavailable"
        );
        describe_histogram!(
            "secret_backend_fetch_duration_seconds",
            Unit::Seconds,
            "Secret store fetch latency"
        );

        counter!("secret_cache_hits_total").absolute(0);
        counter!("secret_cache_misses_total").absolute(0);
        counter!("secret_cache_coalesced_total").absolute(0);
        counter!("secret_cache_stale_served_total").absolute(0);
    }
}

/// Global metrics recorder instance
static METRICS: OnceCell<MetricsRecorder> = OnceCell::new();

/// Initialize metrics collection and Prometheus exporter
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::transport(format!("Failed to initialize metrics exporter: {}", e)))?;

    let recorder = METRICS.get_or_init(MetricsRecorder::new);
    recorder.register_secret_metrics();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}

/// Get the global metrics recorder
pub fn get_metrics() -> Option<&'static MetricsRecorder> {
    METRICS.get()
}

pub fn record_secret_cache_hit() {
    if let Some(metrics) = get_metrics() {
        metrics.record_secret_cache_hit();
    }
}

pub fn record_secret_cache_miss() {
    if let Some(metrics) = get_metrics() {
        metrics.record_secret_cache_miss();
    }
}

pub fn record_secret_fetch(backend: &str, outcome: &str, duration: f64) {
    if let Some(metrics) = get_metrics() {
        metrics.record_secret_fetch(backend, outcome, duration);
    }
}

pub fn record_secret_fetch_coalesced() {
    if let Some(metrics) = get_metrics() {
        metrics.record_secret_fetch_coalesced();
    }
}

pub fn record_stale_secret_served() {
    if let Some(metrics) = get_metrics() {
        metrics.record_stale_secret_served();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording_without_exporter() {
        let recorder = MetricsRecorder::new();
        recorder.register_secret_metrics();
        recorder.record_secret_cache_hit();
        recorder.record_secret_cache_miss();
        recorder.record_secret_fetch("memory", "success", 0.01);
        recorder.record_secret_fetch("vault", "unavailable", 1.5);
        recorder.record_secret_fetch_coalesced();
        recorder.record_stale_secret_served();

        record_secret_cache_hit();
        record_secret_fetch("env", "not_found", 0.0);
    }

    #[test]
    fn test_init_metrics_disabled() {
        let config = ObservabilityConfig { enable_metrics: false, ..Default::default() };
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_init_metrics_no_port() {
        let config =
            ObservabilityConfig { enable_metrics: true, metrics_port: 0, ..Default::default() };
        assert!(init_metrics(&config).is_ok());
    }
}
