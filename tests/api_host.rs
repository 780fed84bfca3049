//! Router-level tests for the HTTP host: health probes, API docs exposure,
//! CORS policy and forwarded headers.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use platformx::api::{build_router, AppState};
use platformx::config::{AppConfig, Environment};
use platformx::observability::{HealthChecker, SecretStoreHealthProvider};
use platformx::secrets::backends::InMemorySecretBackend;
use platformx::secrets::{CacheConfig, SecretClient};
use std::sync::Arc;
use tower::ServiceExt;

async fn state(backend: Arc<InMemorySecretBackend>) -> AppState {
    let client = SecretClient::from_backend(backend, CacheConfig::default());
    let checker = HealthChecker::new();
    checker
        .register_provider("secret_store", Arc::new(SecretStoreHealthProvider::new(client.clone())))
        .await;
    AppState::new(client, checker)
}

fn config_for(environment: Environment, cors: &[&str]) -> AppConfig {
    let mut config = AppConfig::default();
    config.bootstrap.environment_name = environment;
    config.bootstrap.cors_origins = cors.iter().map(|s| s.to_string()).collect();
    config.openapi.title = "Test API".to_string();
    config
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_version_and_instance() {
    let app = build_router(
        state(Arc::new(InMemorySecretBackend::new())).await,
        &config_for(Environment::Development, &[]),
    );

    let response =
        app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], platformx::VERSION);
    assert!(!json["instance_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn readiness_follows_secret_store() {
    let backend = Arc::new(InMemorySecretBackend::new());
    let app = build_router(state(backend.clone()).await, &config_for(Environment::Test, &[]));

    let response = app
        .clone()
        .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    backend.set_available(false);
    let response =
        app.oneshot(Request::get("/health/ready").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"][0]["component"], "secret_store");
}

#[tokio::test]
async fn openapi_served_outside_production() {
    let app = build_router(
        state(Arc::new(InMemorySecretBackend::new())).await,
        &config_for(Environment::Staging, &[]),
    );

    let response = app
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "Test API");
    assert_eq!(json["components"]["securitySchemes"]["AppKey"]["name"], "x-app-key");
    assert_eq!(json["components"]["securitySchemes"]["ApiSecret"]["name"], "x-api-secret");
    assert!(json["paths"]["/health"].is_object());
}

#[tokio::test]
async fn openapi_hidden_in_production() {
    let app = build_router(
        state(Arc::new(InMemorySecretBackend::new())).await,
        &config_for(Environment::Production, &[]),
    );

    let response = app
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_wildcard_subdomain() {
    let app = build_router(
        state(Arc::new(InMemorySecretBackend::new())).await,
        &config_for(Environment::Development, &["https://*.example.com"]),
    );

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/health")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-app-key")
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(preflight("https://portal.example.com")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://portal.example.com");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "PATCH");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-app-key");

    let response = app.oneshot(preflight("https://evil.test")).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn no_cors_headers_without_configured_origins() {
    let app = build_router(
        state(Arc::new(InMemorySecretBackend::new())).await,
        &config_for(Environment::Development, &[]),
    );

    let request = Request::get("/health")
        .header(header::ORIGIN, "https://portal.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn forwarded_headers_do_not_break_requests() {
    let app = build_router(
        state(Arc::new(InMemorySecretBackend::new())).await,
        &config_for(Environment::Development, &[]),
    );

    let request = Request::get("/health")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .header("x-forwarded-proto", "https")
        .header("x-forwarded-host", "api.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn secret_length(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::extract::Path(name): axum::extract::Path<String>,
) -> Result<String, StatusCode> {
    state
        .secret_client
        .get_secret(&name)
        .await
        .map(|value| value.expose_secret().len().to_string())
        .map_err(|_| StatusCode::NOT_FOUND)
}

#[tokio::test]
async fn application_routes_share_the_state_secret_client() {
    let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "hunter2"));
    let state = state(backend.clone()).await;

    let app: axum::Router = axum::Router::new()
        .route("/secrets/{name}/length", axum::routing::get(secret_length))
        .with_state(state.clone());

    let response = app
        .clone()
        .oneshot(Request::get("/secrets/db-pw/length").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"7");

    // The route populated the cache every other holder of the state sees
    assert!(state.secret_client.cache().contains("db-pw").await);
    assert_eq!(backend.fetch_count(), 1);

    let response = app
        .oneshot(Request::get("/secrets/other/length").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
