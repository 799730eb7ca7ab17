//! Pipeline error taxonomy.

use thiserror::Error;

use crate::codec::DecodeError;
use crate::credentials::CredentialsError;
use crate::gateway::{GatewayError, PayloadRole, Stage};
use crate::signer::SignerError;

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Credential resolution was incomplete or failed.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// The private key could not be parsed.
    #[error("failed to load signing key: {0}")]
    Key(#[source] SignerError),

    /// The caller's request is unusable.
    #[error("invalid transaction request: {0}")]
    InvalidRequest(String),

    /// A server-issued payload was not valid base64.
    #[error("failed to decode {role} payload: {source}")]
    Decode {
        role: PayloadRole,
        #[source]
        source: DecodeError,
    },

    /// A server-issued payload could not be signed.
    #[error("failed to sign {role} payload: {source}")]
    Signing {
        role: PayloadRole,
        #[source]
        source: SignerError,
    },

    /// A gateway exchange failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl RelayError {
    /// The pipeline stage the failure is attributed to, if any.
    ///
    /// Decode and signing failures are attributed to the stage that issued
    /// the payload.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RelayError::Decode { role, .. } | RelayError::Signing { role, .. } => Some(role.issued_by()),
            RelayError::Gateway(e) => Some(e.stage()),
            _ => None,
        }
    }

    /// Whether the run failed because credentials were incomplete.
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, RelayError::Credentials(CredentialsError::Missing(_)))
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_attribution() {
        let err = RelayError::Signing {
            role: PayloadRole::Endorse,
            source: SignerError::Signing("boom".to_string()),
        };
        assert_eq!(err.stage(), Some(Stage::Endorse));
        assert_eq!(err.to_string(), "failed to sign endorse payload: Signing error: boom");

        let err = RelayError::Gateway(GatewayError::Timeout {
            stage: Stage::CommitStatus,
            url: "http://gw/commitstatus".to_string(),
            limit: std::time::Duration::from_secs(5),
        });
        assert_eq!(err.stage(), Some(Stage::CommitStatus));

        let err = RelayError::InvalidRequest("empty".to_string());
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn test_missing_credentials_flag() {
        let err = RelayError::from(CredentialsError::Missing(vec!["cert"]));
        assert!(err.is_missing_credentials());
        assert_eq!(err.to_string(), "missing credentials: cert not provided");
    }
}
