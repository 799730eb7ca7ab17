//! Gateway stages, wire envelopes and error definitions.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::signer::DecimalSignature;

/// One named HTTP exchange with the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Proposal,
    Endorse,
    Submit,
    CommitStatus,
    Evaluate,
}

impl Stage {
    /// Path segment appended to the gateway base URL.
    pub fn path(self) -> &'static str {
        match self {
            Stage::Proposal => "proposal",
            Stage::Endorse => "endorse",
            Stage::Submit => "submit",
            Stage::CommitStatus => "commitstatus",
            Stage::Evaluate => "evaluate",
        }
    }

    /// Field under `message` that carries this stage's result.
    pub fn response_field(self) -> &'static str {
        match self {
            Stage::Proposal => "proposal",
            Stage::Endorse => "endorse",
            Stage::Submit => "submit",
            Stage::CommitStatus => "transaction_id",
            Stage::Evaluate => "evaluate",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// The server-issued payload a signed envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadRole {
    Proposal,
    Endorse,
    Submit,
}

impl PayloadRole {
    /// Key of the payload in both the response and the next request.
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadRole::Proposal => "proposal",
            PayloadRole::Endorse => "endorse",
            PayloadRole::Submit => "submit",
        }
    }

    /// The stage whose response issues this payload.
    pub fn issued_by(self) -> Stage {
        match self {
            PayloadRole::Proposal => Stage::Proposal,
            PayloadRole::Endorse => Stage::Endorse,
            PayloadRole::Submit => Stage::Submit,
        }
    }
}

impl std::fmt::Display for PayloadRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for every stage after the proposal.
///
/// Serializes as `{"signedR": .., "signedS": .., "<role>": "<payload>"}`
/// where `payload` is the base64 text exactly as the gateway issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub role: PayloadRole,
    pub payload: String,
    pub signature: DecimalSignature,
}

impl Serialize for SignedEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("signedR", &self.signature.r)?;
        map.serialize_entry("signedS", &self.signature.s)?;
        map.serialize_entry(self.role.as_str(), &self.payload)?;
        map.end()
    }
}

/// Errors raised by a single gateway exchange.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway answered with a non-success status.
    #[error("{stage} call to {url} failed with {status}: {body}")]
    Status {
        stage: Stage,
        url: String,
        status: String,
        body: String,
    },

    /// The request never produced a response.
    #[error("{stage} call to {url} failed: {message}")]
    Transport {
        stage: Stage,
        url: String,
        message: String,
    },

    /// The per-stage deadline elapsed.
    #[error("{stage} call to {url} timed out after {limit:?}")]
    Timeout {
        stage: Stage,
        url: String,
        limit: std::time::Duration,
    },

    /// A success response did not have the expected shape.
    #[error("malformed {stage} response from {url}: {reason}")]
    MalformedResponse {
        stage: Stage,
        url: String,
        reason: String,
    },
}

impl GatewayError {
    /// The stage the error occurred in.
    pub fn stage(&self) -> Stage {
        match self {
            GatewayError::Status { stage, .. }
            | GatewayError::Transport { stage, .. }
            | GatewayError::Timeout { stage, .. }
            | GatewayError::MalformedResponse { stage, .. } => *stage,
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_paths() {
        let paths: Vec<_> = [
            Stage::Proposal,
            Stage::Endorse,
            Stage::Submit,
            Stage::CommitStatus,
            Stage::Evaluate,
        ]
        .iter()
        .map(|s| s.path())
        .collect();
        assert_eq!(paths, ["proposal", "endorse", "submit", "commitstatus", "evaluate"]);
        assert_eq!(Stage::CommitStatus.response_field(), "transaction_id");
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = SignedEnvelope {
            role: PayloadRole::Endorse,
            payload: "AAEC".to_string(),
            signature: DecimalSignature {
                r: "123".to_string(),
                s: "456".to_string(),
            },
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"signedR": "123", "signedS": "456", "endorse": "AAEC"})
        );
    }

    #[test]
    fn test_role_issued_by() {
        assert_eq!(PayloadRole::Proposal.issued_by(), Stage::Proposal);
        assert_eq!(PayloadRole::Submit.issued_by(), Stage::Submit);
    }

    #[test]
    fn test_error_display_names_stage_and_url() {
        let err = GatewayError::Status {
            stage: Stage::Endorse,
            url: "https://gw/endorse".to_string(),
            status: "500 Internal Server Error".to_string(),
            body: "{\"error\":\"peer down\"}".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("endorse call to https://gw/endorse failed with 500"));
        assert!(text.contains("peer down"));
        assert_eq!(err.stage(), Stage::Endorse);
    }
}
