//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → network.rs (built-in profiles + overrides → NetworkRegistry)
//!     → shared via Arc with every pipeline
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod network;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use network::{NetworkId, NetworkProfile, NetworkRegistry, UnknownNetwork};
pub use schema::{CredentialsConfig, GatewayConfig, ObservabilityConfig, RelayConfig};
