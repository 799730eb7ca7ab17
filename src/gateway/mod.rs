//! Gateway integration subsystem.
//!
//! # Data Flow
//! ```text
//! request body (proposal payload or signed envelope)
//!     → client.rs (POST {base}/{stage}, optional deadline)
//!     → types.rs (stage naming, envelope wire shape, errors)
//!     → parsed `message.<field>` handed back to the relay
//! ```
//!
//! # Design Decisions
//! - One POST per stage, no retries: a consumed proposal cannot be resumed
//! - Error bodies are kept verbatim (truncated) next to the status line
//! - Request bodies are never logged, they carry the caller's certificate

pub mod client;
pub mod types;

pub use client::{build_http_client, GatewayClient};
pub use types::{GatewayError, GatewayResult, PayloadRole, SignedEnvelope, Stage};
