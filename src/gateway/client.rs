//! Gateway HTTP client with per-stage deadlines and error capture.
//!
//! # Responsibilities
//! - POST JSON bodies to `{base}/{stage}`
//! - Surface non-success statuses with the status line and raw body
//! - Reject success bodies that are not JSON or lack `message.<field>`
//! - Enforce the optional per-stage deadline

use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::schema::GatewayConfig;
use crate::gateway::types::{GatewayError, GatewayResult, Stage};
use crate::observability::metrics;

/// Longest slice of a response body carried into an error.
const MAX_BODY_SNIPPET: usize = 512;

/// Build the shared HTTP client used for every gateway call.
pub fn build_http_client(config: &GatewayConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
}

/// Client for one gateway base URL.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    stage_timeout: Option<Duration>,
}

impl GatewayClient {
    /// Create a client for `base_url`. A trailing slash is ignored.
    pub fn new(http: reqwest::Client, base_url: &str, stage_timeout: Option<Duration>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            stage_timeout,
        }
    }

    /// Full URL for a stage.
    pub fn stage_url(&self, stage: Stage) -> String {
        format!("{}/{}", self.base_url, stage.path())
    }

    /// Perform one exchange and return the parsed response body.
    pub async fn call<B>(&self, stage: Stage, body: &B) -> GatewayResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.stage_url(stage);
        let started = Instant::now();

        tracing::debug!(stage = %stage, url = %url, "Calling gateway");

        let result = match self.stage_timeout {
            Some(limit) => match timeout(limit, self.exchange(stage, &url, body)).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout {
                    stage,
                    url: url.clone(),
                    limit,
                }),
            },
            None => self.exchange(stage, &url, body).await,
        };

        let elapsed = started.elapsed();
        metrics::record_stage(stage, elapsed, result.is_ok());

        match &result {
            Ok(_) => tracing::debug!(
                stage = %stage,
                elapsed_ms = elapsed.as_millis() as u64,
                "Gateway call succeeded"
            ),
            Err(e) => tracing::warn!(
                stage = %stage,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "Gateway call failed"
            ),
        }

        result
    }

    /// Perform one exchange and return `message.<field>` for the stage.
    pub async fn call_for_field<B>(&self, stage: Stage, body: &B) -> GatewayResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let response = self.call(stage, body).await?;
        self.message_field(stage, response)
    }

    /// Pull `message.<field>` out of a stage response.
    pub fn message_field(&self, stage: Stage, response: Value) -> GatewayResult<Value> {
        let field = stage.response_field();
        match response {
            Value::Object(mut root) => match root.remove("message") {
                Some(Value::Object(mut message)) => match message.remove(field) {
                    Some(Value::Null) | None => Err(self.malformed(
                        stage,
                        format!("missing field message.{}", field),
                    )),
                    Some(value) => Ok(value),
                },
                Some(_) => Err(self.malformed(stage, "field message is not an object".to_string())),
                None => Err(self.malformed(stage, "missing field message".to_string())),
            },
            _ => Err(self.malformed(stage, "body is not a JSON object".to_string())),
        }
    }

    async fn exchange<B>(&self, stage: Stage, url: &str, body: &B) -> GatewayResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                stage,
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| GatewayError::Transport {
            stage,
            url: url.to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                stage,
                url: url.to_string(),
                status: status_line(status),
                body: body_snippet(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            self.malformed(
                stage,
                format!("body is not JSON ({}): {}", e, body_snippet(&text)),
            )
        })
    }

    fn malformed(&self, stage: Stage, reason: String) -> GatewayError {
        GatewayError::MalformedResponse {
            stage,
            url: self.stage_url(stage),
            reason,
        }
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("stage_timeout", &self.stage_timeout)
            .finish()
    }
}

fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn body_snippet(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "<empty body>".to_string();
    }
    match text.char_indices().nth(MAX_BODY_SNIPPET) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> GatewayClient {
        GatewayClient::new(reqwest::Client::new(), "https://gw.example/transaction/v1/", None)
    }

    #[test]
    fn test_stage_url_joins_base() {
        let client = client();
        assert_eq!(
            client.stage_url(Stage::CommitStatus),
            "https://gw.example/transaction/v1/commitstatus"
        );
    }

    #[test]
    fn test_message_field_extracts_value() {
        let value = client()
            .message_field(Stage::Proposal, json!({"message": {"proposal": "AAEC"}}))
            .unwrap();
        assert_eq!(value, json!("AAEC"));
    }

    #[test]
    fn test_message_field_missing() {
        let err = client()
            .message_field(Stage::Endorse, json!({"message": {"proposal": "AAEC"}}))
            .unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse { stage: Stage::Endorse, .. }));
        assert!(err.to_string().contains("message.endorse"));

        let err = client()
            .message_field(Stage::Evaluate, json!({"result": "1000"}))
            .unwrap_err();
        assert!(err.to_string().contains("missing field message"));

        let err = client().message_field(Stage::Evaluate, json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn test_null_field_is_missing() {
        let err = client()
            .message_field(Stage::CommitStatus, json!({"message": {"transaction_id": null}}))
            .unwrap_err();
        assert!(err.to_string().contains("message.transaction_id"));
    }

    #[test]
    fn test_body_snippet_truncates() {
        assert_eq!(body_snippet("  "), "<empty body>");
        assert_eq!(body_snippet(" short "), "short");
        let long = "x".repeat(MAX_BODY_SNIPPET + 10);
        let snippet = body_snippet(&long);
        assert_eq!(snippet.len(), MAX_BODY_SNIPPET + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            "500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let client = GatewayClient::new(reqwest::Client::new(), "http://127.0.0.1:1", None);
        let err = client.call(Stage::Proposal, &json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport { stage: Stage::Proposal, .. }));
    }
}
