//! # Configuration Management
//!
//! Environment-driven configuration for the PlatformX host. A `.env` file in
//! the working directory is loaded first (see [`load_dotenv`]), then each
//! section reads its own variables.

pub mod settings;

pub use settings::{
    ApiServerConfig, AppConfig, BootstrapConfig, Environment, ObservabilityConfig,
    OpenApiInfoConfig, SecretsConfig, DEFAULT_AWS_REGION,
};

use crate::errors::{Error, Result};

/// Load a `.env` file if present. A missing file is not an error; variables
/// already set in the process environment win.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::config(format!("Error loading .env file: {}", e))),
    }
}
