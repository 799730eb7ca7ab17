//! Credentials from environment variables.
//!
//! Reads `KALP_ENROLLMENT_ID`, `KALP_PRIVATE_KEY` (or `KALP_PRIVATE_KEY_FILE`)
//! and `KALP_CERT` (or `KALP_CERT_FILE`). Inline values win over files.

use std::path::PathBuf;

use crate::config::NetworkId;
use crate::credentials::{inline_or_file, CredentialSource, Credentials, CredentialsError};

pub const ENROLLMENT_ID_ENV_VAR: &str = "KALP_ENROLLMENT_ID";
pub const PRIVATE_KEY_ENV_VAR: &str = "KALP_PRIVATE_KEY";
pub const PRIVATE_KEY_FILE_ENV_VAR: &str = "KALP_PRIVATE_KEY_FILE";
pub const CERT_ENV_VAR: &str = "KALP_CERT";
pub const CERT_FILE_ENV_VAR: &str = "KALP_CERT_FILE";

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Credential source backed by process environment variables.
pub struct EnvCredentials {
    lookup: Lookup,
}

impl EnvCredentials {
    /// Read from the process environment at resolution time.
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Read variables through `lookup` instead of the process environment.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredentials {
    fn resolve(&self, network: NetworkId) -> Result<Credentials, CredentialsError> {
        tracing::debug!(network = %network, "Resolving credentials from environment");

        let private_key = inline_or_file(
            "privateKey",
            &self.var(PRIVATE_KEY_ENV_VAR),
            &self.var(PRIVATE_KEY_FILE_ENV_VAR).map(PathBuf::from),
        )?;
        let cert = inline_or_file(
            "cert",
            &self.var(CERT_ENV_VAR),
            &self.var(CERT_FILE_ENV_VAR).map(PathBuf::from),
        )?;

        Credentials::from_parts(self.var(ENROLLMENT_ID_ENV_VAR), private_key, cert)
    }
}

impl std::fmt::Debug for EnvCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvCredentials").finish_non_exhaustive()
    }
}
