//! Signed transaction relay.
//!
//! # Data Flow
//! ```text
//! network id + chain code call
//!     → client.rs (resolve credentials, parse key, bind network profile)
//!     → request.rs (TransactionRequest, proposal wire body)
//!     → orchestrator.rs (stage sequence, sign each issued payload)
//!     → transaction ID (submit) or chain code result (evaluate)
//! ```
//!
//! # Design Decisions
//! - Missing credentials and bad keys fail before any gateway call
//! - A run never retries a stage; each stage call happens at most once
//! - Stage and role are carried on every error

pub mod client;
pub mod error;
pub mod orchestrator;
pub mod request;

pub use client::RelayClient;
pub use error::{RelayError, RelayResult};
pub use orchestrator::Pipeline;
pub use request::{ChaincodeCall, TransactionRequest, BALANCE_OF_TRANSACTION, TRANSFER_TRANSACTION};
