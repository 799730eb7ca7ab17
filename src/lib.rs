//! Kalp gateway signed transaction relay.

pub mod codec;
pub mod config;
pub mod credentials;
pub mod gateway;
pub mod input;
pub mod observability;
pub mod relay;
pub mod signer;

pub use config::schema::RelayConfig;
pub use config::NetworkId;
pub use credentials::{CredentialSource, Credentials, EnvCredentials};
pub use relay::{ChaincodeCall, RelayClient, RelayError, RelayResult};
