//! Environment variable secret backend.
//!
//! Reads secrets from `PLATFORMX_SECRET_<NAME>` variables. Intended for
//! **development and testing only**: environment variables are visible in
//! process listings and have no access control or audit trail.
//!
//! The variable name is the secret name upper-cased with every character
//! outside `[A-Z0-9_]` replaced by `_`, so `db-pw` reads
//! `PLATFORMX_SECRET_DB_PW` and `app/api.key` reads `PLATFORMX_SECRET_APP_API_KEY`.

use async_trait::async_trait;
use std::env;

use crate::secrets::backend::{SecretBackendKind, SecretStoreBackend};
use crate::secrets::error::{BackendError, BackendResult};

/// Environment variable prefix for secrets.
pub const SECRET_ENV_PREFIX: &str = "PLATFORMX_SECRET_";

/// Read-only secret backend over the process environment.
///
/// Name mapping is lossy: `Token` and `token` read the same variable, as do
/// `db-pw`, `db.pw` and `DB_PW`. The cache still keys them separately, so
/// each alias costs its own fetch and expires on its own. Use one spelling
/// per secret.
#[derive(Debug, Clone)]
pub struct EnvVarSecretBackend {
    prefix: String,
}

impl Default for EnvVarSecretBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvVarSecretBackend {
    pub fn new() -> Self {
        Self { prefix: SECRET_ENV_PREFIX.to_string() }
    }

    /// Use a custom variable prefix instead of `PLATFORMX_SECRET_`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Variable name consulted for `name`.
    pub fn env_var_name(&self, name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

#[async_trait]
impl SecretStoreBackend for EnvVarSecretBackend {
    async fn fetch(&self, name: &str) -> BackendResult<String> {
        let var = self.env_var_name(name);
        match env::var(&var) {
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(BackendError::not_found(name)),
            Err(env::VarError::NotUnicode(_)) => Err(BackendError::unavailable(format!(
                "environment variable {} is not valid unicode",
                var
            ))),
        }
    }

    fn kind(&self) -> SecretBackendKind {
        SecretBackendKind::Env
    }
}
