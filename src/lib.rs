//! # PlatformX
//!
//! Service host for PlatformX APIs with a cached secret retrieval layer.
//!
//! ## Architecture
//!
//! ```text
//! HTTP host (health, docs, CORS, forwarded headers)
//!      ↓ AppState
//! SecretClient → SecretCache → SecretStoreBackend (AWS, Vault, env, memory)
//! ```
//!
//! ## Core Components
//!
//! - **Secrets**: TTL-bounded cache with per-name coalescing in front of a
//!   pluggable secret store ([`secrets`])
//! - **API**: Axum router with health probes and Swagger UI ([`api`])
//! - **Configuration**: environment-driven settings validated at startup ([`config`])
//! - **Observability**: tracing subscriber, Prometheus metrics, health checks
//!   ([`observability`])
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use platformx::{config::AppConfig, secrets::{backends::build_backend, SecretClient}, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let backend = build_backend(&config.secrets).await?;
//!     let client = SecretClient::from_backend(backend, config.secrets.cache_config());
//!     let db_password = client.get_secret("db-password").await?;
//!     println!("{} bytes", db_password.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;

pub use config::{AppConfig, Environment};
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
