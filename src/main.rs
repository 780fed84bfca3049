use std::sync::Arc;

use platformx::{
    api::{start_api_server, AppState},
    config::{load_dotenv, AppConfig},
    observability::{init_observability, log_config_info, service_span, SecretStoreHealthProvider},
    secrets::{backends::build_backend, SecretClient},
    Result, APP_NAME, VERSION,
};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<()> {
    // Must happen before any config is read from environment
    load_dotenv()?;

    let config = AppConfig::from_env()?;
    let health_checker = init_observability(&config.observability)?;

    let span = service_span(&config);
    run(config, health_checker).instrument(span).await
}

async fn run(config: AppConfig, health_checker: platformx::observability::HealthChecker) -> Result<()> {
    info!(app_name = APP_NAME, version = VERSION, "Starting PlatformX service host");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e);
    }
    log_config_info(&config);

    let backend = build_backend(&config.secrets).await?;
    let secret_client = SecretClient::from_backend(backend, config.secrets.cache_config());

    health_checker
        .register_provider(
            "secret_store",
            Arc::new(SecretStoreHealthProvider::new(secret_client.clone())),
        )
        .await;

    let state = AppState::new(secret_client, health_checker);
    start_api_server(&config, state).await?;

    info!("PlatformX service host stopped");
    Ok(())
}
