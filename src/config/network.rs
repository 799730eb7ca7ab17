//! Network profiles.
//!
//! Each supported environment maps to an immutable profile. The registry is
//! built once at start-up (built-in values plus config overrides) and shared
//! read-only by every pipeline.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a supported ledger environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NetworkId {
    #[serde(rename = "DEVNET")]
    Devnet,
    #[serde(rename = "LOADNET")]
    Loadnet,
    #[serde(rename = "PROD_TESTNET_NEW")]
    ProdTestnet,
}

impl NetworkId {
    /// Every supported network, in display order.
    pub const ALL: [NetworkId; 3] = [NetworkId::Devnet, NetworkId::Loadnet, NetworkId::ProdTestnet];

    /// Canonical identifier as used in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkId::Devnet => "DEVNET",
            NetworkId::Loadnet => "LOADNET",
            NetworkId::ProdTestnet => "PROD_TESTNET_NEW",
        }
    }

    fn index(self) -> usize {
        match self {
            NetworkId::Devnet => 0,
            NetworkId::Loadnet => 1,
            NetworkId::ProdTestnet => 2,
        }
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// An unknown network identifier.
#[derive(Debug, Clone, Error)]
#[error("unknown network '{0}', expected one of DEVNET, LOADNET, PROD_TESTNET_NEW")]
pub struct UnknownNetwork(pub String);

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "DEVNET" => Ok(NetworkId::Devnet),
            "LOADNET" => Ok(NetworkId::Loadnet),
            "PROD_TESTNET_NEW" | "PROD_TESTNET" => Ok(NetworkId::ProdTestnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

/// Connection details of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Human-readable name.
    pub label: String,
    /// Base URL the stage paths are appended to.
    pub gateway_base_url: String,
    /// Ledger channel transactions are proposed on.
    pub channel_name: String,
    /// Chain code used by the transfer and balance shortcuts.
    pub chain_code_name: String,
}

impl NetworkProfile {
    /// Built-in profile of a network.
    pub fn builtin(id: NetworkId) -> Self {
        let (label, url, channel, chain_code) = match id {
            NetworkId::Devnet => (
                "Devnet",
                "https://dev-kalp-gateway.p2eppl.com/transaction/v1",
                "kalp-devnet",
                "klp-f02611a93e2-cc",
            ),
            NetworkId::Loadnet => (
                "Loadnet",
                "https://loadnet-kalp-gateway.p2eppl.com/transaction/v1",
                "kalp-loadnet",
                "klp-f02611a93e-cc",
            ),
            NetworkId::ProdTestnet => (
                "Prod Testnet",
                "https://rpc-mumbai-newtest.kalp.network/transaction/v1",
                "kalptantra",
                "klp-f02611a93e-cc",
            ),
        };
        Self {
            label: label.to_string(),
            gateway_base_url: url.to_string(),
            channel_name: channel.to_string(),
            chain_code_name: chain_code.to_string(),
        }
    }

    fn apply(&mut self, overrides: &NetworkOverride) {
        if let Some(label) = &overrides.label {
            self.label = label.clone();
        }
        if let Some(url) = &overrides.gateway_base_url {
            self.gateway_base_url = url.clone();
        }
        if let Some(channel) = &overrides.channel_name {
            self.channel_name = channel.clone();
        }
        if let Some(chain_code) = &overrides.chain_code_name {
            self.chain_code_name = chain_code.clone();
        }
    }
}

/// Partial replacement of a built-in profile, as written in config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkOverride {
    pub label: Option<String>,
    pub gateway_base_url: Option<String>,
    pub channel_name: Option<String>,
    pub chain_code_name: Option<String>,
}

/// Immutable lookup table of network profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRegistry {
    profiles: [NetworkProfile; 3],
}

impl NetworkRegistry {
    /// Registry holding the built-in profiles.
    pub fn builtin() -> Self {
        Self {
            profiles: NetworkId::ALL.map(NetworkProfile::builtin),
        }
    }

    /// Registry holding the built-in profiles with `overrides` applied.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a NetworkId, &'a NetworkOverride)>,
    {
        let mut registry = Self::builtin();
        for (id, network_override) in overrides {
            registry.profiles[id.index()].apply(network_override);
        }
        registry
    }

    /// Profile of `id`.
    pub fn get(&self, id: NetworkId) -> &NetworkProfile {
        &self.profiles[id.index()]
    }

    /// All profiles in display order.
    pub fn iter(&self) -> impl Iterator<Item = (NetworkId, &NetworkProfile)> {
        NetworkId::ALL.into_iter().zip(self.profiles.iter())
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
