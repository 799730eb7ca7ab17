//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every effective network profile (URL scheme, non-empty names)
//! - Validate value ranges (timeouts > 0, known log levels)
//! - Check credential overrides are complete and unambiguous
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::network::NetworkRegistry;
use crate::config::schema::{CredentialsConfig, RelayConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("must be one of {}", LOG_LEVELS.join(", ")),
        ));
    }

    if config.gateway.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("gateway.connect_timeout_secs", "must be > 0"));
    }
    if config.gateway.stage_timeout_secs == Some(0) {
        errors.push(ValidationError::new("gateway.stage_timeout_secs", "must be > 0 when set"));
    }

    let registry = NetworkRegistry::with_overrides(&config.networks);
    for (id, profile) in registry.iter() {
        let prefix = format!("networks.{}", id);
        match url::Url::parse(&profile.gateway_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::new(
                format!("{}.gateway_base_url", prefix),
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                format!("{}.gateway_base_url", prefix),
                format!("invalid URL: {}", e),
            )),
        }
        for (name, value) in [
            ("label", &profile.label),
            ("channel_name", &profile.channel_name),
            ("chain_code_name", &profile.chain_code_name),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(format!("{}.{}", prefix, name), "must not be empty"));
            }
        }
    }

    for (id, credentials) in &config.credentials {
        validate_credentials(&format!("credentials.{}", id), credentials, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_credentials(prefix: &str, credentials: &CredentialsConfig, errors: &mut Vec<ValidationError>) {
    if credentials
        .enrollment_id
        .as_deref()
        .map_or(true, |id| id.trim().is_empty())
    {
        errors.push(ValidationError::new(format!("{}.enrollment_id", prefix), "is required"));
    }

    let sources = [
        ("private_key", credentials.private_key.is_some(), credentials.private_key_path.is_some()),
        ("cert", credentials.cert.is_some(), credentials.cert_path.is_some()),
    ];
    for (name, inline, path) in sources {
        match (inline, path) {
            (true, true) => errors.push(ValidationError::new(
                format!("{}.{}", prefix, name),
                format!("set either {} or {}_path, not both", name, name),
            )),
            (false, false) => errors.push(ValidationError::new(
                format!("{}.{}", prefix, name),
                format!("one of {} or {}_path is required", name, name),
            )),
            _ => {}
        }
    }
}
