//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay pipelines and gateway calls produce:
//!     → logging.rs (structured tracing events, per-run spans)
//!     → metrics.rs (stage counters and latency histograms)
//!
//! Consumers:
//!     → stderr via tracing-subscriber (binary)
//!     → any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Every pipeline run carries a `run_id` span field for correlation
//! - Key material and certificates never reach a log line
//! - The library never installs a subscriber or recorder itself

pub mod logging;
pub mod metrics;
