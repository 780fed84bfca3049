use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};

use crate::config::AppConfig;
use crate::observability::HealthChecker;
use crate::secrets::SecretClient;

use super::{
    docs::docs_router,
    forwarded::{forwarded_headers, ForwardedInfo},
    handlers::{health_handler, readiness_handler},
};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Secret access for application routes. Handlers extract
    /// `State<AppState>` and call `get_secret` instead of building their own
    /// client, so every route shares one cache.
    pub secret_client: SecretClient,
    pub health_checker: HealthChecker,
}

impl AppState {
    pub fn new(secret_client: SecretClient, health_checker: HealthChecker) -> Self {
        Self { secret_client, health_checker }
    }
}

pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/health/ready", get(readiness_handler));

    if config.bootstrap.environment_name.is_production() {
        info!("Production environment: API documentation is not served");
    } else {
        router = router.merge(docs_router(&config.openapi));
    }

    // Connection tasks start without a span; parent requests on the span
    // active when the router is built (the service span in the binary).
    let root_span = Span::current();
    let trace_layer = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let forwarded = request.extensions().get::<ForwardedInfo>();
        info_span!(
            parent: &root_span,
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            client_ip = forwarded.and_then(|f| f.client_ip.as_deref()).unwrap_or("-"),
            request_id = %uuid::Uuid::new_v4(),
        )
    });

    let mut router = router.layer(trace_layer).layer(middleware::from_fn(forwarded_headers));

    if let Some(cors) = cors_layer(&config.bootstrap.cors_origins) {
        router = router.layer(cors);
    }

    router.with_state(state)
}

/// CORS policy for the configured origins, or `None` when no origins are set.
///
/// Entries may contain a `*.` wildcard for subdomains
/// (`https://*.example.com`). Methods and request headers are mirrored so
/// credentials can be allowed.
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allowed: Vec<String> =
        origins.iter().map(|o| o.trim().trim_end_matches('/').to_ascii_lowercase()).collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
                origin
                    .to_str()
                    .map(|origin| {
                        let origin = origin.to_ascii_lowercase();
                        allowed.iter().any(|pattern| origin_matches(pattern, &origin))
                    })
                    .unwrap_or(false)
            }))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    )
}

/// Exact match, or a subdomain match for `scheme://*.domain` patterns.
pub(crate) fn origin_matches(pattern: &str, origin: &str) -> bool {
    if pattern == origin {
        return true;
    }

    let Some((scheme, host_pattern)) = pattern.split_once("://") else {
        return false;
    };
    let Some(suffix) = host_pattern.strip_prefix("*.") else {
        return false;
    };
    let Some(host) = origin.strip_prefix(scheme).and_then(|rest| rest.strip_prefix("://")) else {
        return false;
    };

    host.len() > suffix.len() + 1
        && host.ends_with(suffix)
        && host[..host.len() - suffix.len()].ends_with('.')
}
