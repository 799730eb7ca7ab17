//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::network::{NetworkId, NetworkOverride};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Network used when the caller does not name one.
    pub default_network: NetworkId,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Gateway HTTP settings.
    pub gateway: GatewayConfig,

    /// Partial overrides of the built-in network profiles.
    pub networks: BTreeMap<NetworkId, NetworkOverride>,

    /// Fixed per-network credentials.
    pub credentials: BTreeMap<NetworkId, CredentialsConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_network: NetworkId::Devnet,
            observability: ObservabilityConfig::default(),
            gateway: GatewayConfig::default(),
            networks: BTreeMap::new(),
            credentials: BTreeMap::new(),
        }
    }
}

/// Gateway HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for each stage's round trip. `None` waits for the transport.
    pub stage_timeout_secs: Option<u64>,

    /// User-Agent header sent with every call.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            stage_timeout_secs: None,
            user_agent: format!("kalp-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Credentials pinned to one network.
///
/// Key and certificate may be given inline or as a path to a PEM file.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub enrollment_id: Option<String>,
    pub private_key: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub cert: Option<String>,
    pub cert_path: Option<PathBuf>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("enrollment_id", &self.enrollment_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("private_key_path", &self.private_key_path)
            .field("cert", &self.cert.as_ref().map(|_| "<redacted>"))
            .field("cert_path", &self.cert_path)
            .finish()
    }
}
