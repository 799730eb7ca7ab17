//! Caller identity resolution.
//!
//! # Data Flow
//! ```text
//! network id
//!     → CredentialResolver (fixed per-network entries from config)
//!     → fallback source (environment, see env.rs)
//!     → Credentials (trimmed, all three fields present)
//! ```
//!
//! # Security Constraints
//! - Credentials are resolved per pipeline run and dropped afterwards
//! - Key and certificate text are zeroized on drop and never printed

pub mod env;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{CredentialsConfig, NetworkId};

pub use env::EnvCredentials;

/// Errors raised while resolving credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// One or more of enrollment ID, private key and certificate are absent.
    #[error("missing credentials: {} not provided", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A key or certificate file could not be read.
    #[error("failed to read {field} from {}: {source}", .path.display())]
    Read {
        field: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The identity a pipeline run acts as.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    enrollment_id: String,
    private_key: String,
    cert: String,
}

impl Credentials {
    /// Build credentials, trimming each field.
    ///
    /// Fails with [`CredentialsError::Missing`] naming every empty field.
    pub fn new(
        enrollment_id: impl Into<String>,
        private_key: impl Into<String>,
        cert: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        Self::from_parts(
            Some(enrollment_id.into()),
            Some(private_key.into()),
            Some(cert.into()),
        )
    }

    /// Build credentials from optional parts, as delivered by external stores.
    pub fn from_parts(
        enrollment_id: Option<String>,
        private_key: Option<String>,
        cert: Option<String>,
    ) -> Result<Self, CredentialsError> {
        let enrollment_id = non_empty(enrollment_id);
        let private_key = non_empty(private_key);
        let cert = non_empty(cert);

        let mut missing = Vec::new();
        if enrollment_id.is_none() {
            missing.push("enrollmentId");
        }
        if private_key.is_none() {
            missing.push("privateKey");
        }
        if cert.is_none() {
            missing.push("cert");
        }

        match (enrollment_id, private_key, cert) {
            (Some(enrollment_id), Some(private_key), Some(cert)) => Ok(Self {
                enrollment_id,
                private_key,
                cert,
            }),
            _ => Err(CredentialsError::Missing(missing)),
        }
    }

    pub fn enrollment_id(&self) -> &str {
        &self.enrollment_id
    }

    /// PEM text of the private key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// PEM text of the client certificate.
    pub fn cert(&self) -> &str {
        &self.cert
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("enrollment_id", &self.enrollment_id)
            .field("private_key", &"<redacted>")
            .field("cert", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Anything that can hand out credentials for a network.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self, network: NetworkId) -> Result<Credentials, CredentialsError>;
}

/// A fixed identity used on every network.
impl CredentialSource for Credentials {
    fn resolve(&self, _network: NetworkId) -> Result<Credentials, CredentialsError> {
        Ok(self.clone())
    }
}

/// Per-network fixed credentials with an optional fallback source.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    entries: BTreeMap<NetworkId, CredentialsConfig>,
    fallback: Option<Arc<dyn CredentialSource>>,
}

impl CredentialResolver {
    /// Resolver with no entries and no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver holding the `[credentials.*]` entries of a config file.
    pub fn from_config(entries: &BTreeMap<NetworkId, CredentialsConfig>) -> Self {
        Self {
            entries: entries.clone(),
            fallback: None,
        }
    }

    /// Pin inline credentials to `network`.
    pub fn with_entry(mut self, network: NetworkId, credentials: &Credentials) -> Self {
        self.entries.insert(
            network,
            CredentialsConfig {
                enrollment_id: Some(credentials.enrollment_id.clone()),
                private_key: Some(credentials.private_key.clone()),
                cert: Some(credentials.cert.clone()),
                ..Default::default()
            },
        );
        self
    }

    /// Source consulted for networks without a fixed entry.
    pub fn with_fallback(mut self, source: impl CredentialSource + 'static) -> Self {
        self.fallback = Some(Arc::new(source));
        self
    }
}

impl CredentialSource for CredentialResolver {
    fn resolve(&self, network: NetworkId) -> Result<Credentials, CredentialsError> {
        if let Some(entry) = self.entries.get(&network) {
            tracing::debug!(network = %network, "Using fixed credentials");
            let private_key = inline_or_file("privateKey", &entry.private_key, &entry.private_key_path)?;
            let cert = inline_or_file("cert", &entry.cert, &entry.cert_path)?;
            return Credentials::from_parts(entry.enrollment_id.clone(), private_key, cert);
        }

        match &self.fallback {
            Some(source) => source.resolve(network),
            None => Err(CredentialsError::Missing(vec!["enrollmentId", "privateKey", "cert"])),
        }
    }
}

pub(crate) fn inline_or_file(
    field: &'static str,
    inline: &Option<String>,
    path: &Option<PathBuf>,
) -> Result<Option<String>, CredentialsError> {
    match (inline, path) {
        (Some(value), _) => Ok(Some(value.clone())),
        (None, Some(path)) => read_pem(field, path).map(Some),
        (None, None) => Ok(None),
    }
}

pub(crate) fn read_pem(field: &'static str, path: &Path) -> Result<String, CredentialsError> {
    std::fs::read_to_string(path).map_err(|source| CredentialsError::Read {
        field,
        path: path.to_path_buf(),
        source,
    })
}
