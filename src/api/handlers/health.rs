//! Health check endpoints for monitoring and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::routes::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status (always "ok" when responding)
    #[schema(example = "ok")]
    pub status: String,
    /// Crate version of the running binary
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Identifier unique to this process
    pub instance_id: String,
}

/// Result of one component check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    #[schema(example = "secret_store")]
    pub component: String,
    #[schema(example = "healthy")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall status: healthy, degraded or unhealthy
    #[schema(example = "healthy")]
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// Health check endpoint
///
/// Returns 200 OK whenever the API server can respond. Suitable for liveness
/// probes and load balancer checks.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instance_id: state.health_checker.instance_id().to_string(),
        }),
    )
}

/// Readiness endpoint
///
/// Runs every registered health provider. Returns 503 when any component is
/// unhealthy.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "All components operational", body = ReadinessResponse),
        (status = 503, description = "At least one component is unhealthy", body = ReadinessResponse)
    )
)]
pub async fn readiness_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let checks = state.health_checker.check_all().await;
    let overall = crate::observability::HealthChecker::summarize(&checks);

    let mut components: Vec<ComponentHealth> = checks
        .into_values()
        .map(|check| ComponentHealth {
            component: check.component,
            status: check.status.as_str().to_string(),
            message: check.status.message().map(str::to_string),
        })
        .collect();
    components.sort_by(|a, b| a.component.cmp(&b.component));

    let code =
        if overall.is_operational() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (code, Json(ReadinessResponse { status: overall.as_str().to_string(), checks: components }))
}
