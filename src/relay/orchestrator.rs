//! Submit and evaluate pipelines.
//!
//! # State Machines
//! ```text
//! submit:   PROPOSAL → SIGN(proposal) → ENDORSE → SIGN(endorse)
//!           → SUBMIT → SIGN(submit) → COMMIT_STATUS → transaction id
//! evaluate: PROPOSAL → SIGN(proposal) → EVALUATE → result
//! ```
//!
//! Stages run strictly in sequence; each takes the previous stage's payload
//! as input. The first failure ends the run, nothing is compensated.
//! Dropping the returned future abandons the in-flight call and no later
//! stage is attempted.

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::codec;
use crate::gateway::{GatewayClient, GatewayError, PayloadRole, SignedEnvelope, Stage};
use crate::observability::metrics;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::request::TransactionRequest;
use crate::signer::PrivateKey;

/// Drives one gateway through the signed handshake.
pub struct Pipeline<'a> {
    gateway: &'a GatewayClient,
    key: &'a PrivateKey,
}

impl<'a> Pipeline<'a> {
    pub fn new(gateway: &'a GatewayClient, key: &'a PrivateKey) -> Self {
        Self { gateway, key }
    }

    /// Run the write path and return the committed transaction ID.
    pub async fn submit(&self, request: TransactionRequest) -> RelayResult<String> {
        let span = tracing::info_span!(
            "submit",
            run_id = %Uuid::new_v4(),
            chain_code = %request.chain_code_name(),
            transaction = %request.transaction_name(),
        );
        let result = self.run_submit(&request).instrument(span).await;
        metrics::record_pipeline("submit", result.is_ok());
        result
    }

    /// Run the read path and return the chain code's result.
    pub async fn evaluate(&self, request: TransactionRequest) -> RelayResult<String> {
        let span = tracing::info_span!(
            "evaluate",
            run_id = %Uuid::new_v4(),
            chain_code = %request.chain_code_name(),
            transaction = %request.transaction_name(),
        );
        let result = self.run_evaluate(&request).instrument(span).await;
        metrics::record_pipeline("evaluate", result.is_ok());
        result
    }

    async fn run_submit(&self, request: &TransactionRequest) -> RelayResult<String> {
        tracing::info!(params = request.params().len(), "Submitting transaction");

        let proposal = self.payload_from(Stage::Proposal, &request.proposal_body()).await?;
        let endorse = self
            .payload_from(Stage::Endorse, &self.sign_payload(PayloadRole::Proposal, proposal)?)
            .await?;
        let submit = self
            .payload_from(Stage::Submit, &self.sign_payload(PayloadRole::Endorse, endorse)?)
            .await?;
        let commit = self.sign_payload(PayloadRole::Submit, submit)?;

        let value = self.gateway.call_for_field(Stage::CommitStatus, &commit).await?;
        let transaction_id = self.expect_string(Stage::CommitStatus, value)?;

        tracing::info!(transaction_id = %transaction_id, "Transaction committed");
        Ok(transaction_id)
    }

    async fn run_evaluate(&self, request: &TransactionRequest) -> RelayResult<String> {
        tracing::info!(params = request.params().len(), "Evaluating transaction");

        let proposal = self.payload_from(Stage::Proposal, &request.proposal_body()).await?;
        let signed = self.sign_payload(PayloadRole::Proposal, proposal)?;

        let result = match self.gateway.call_for_field(Stage::Evaluate, &signed).await? {
            Value::String(text) => text,
            other => other.to_string(),
        };

        tracing::info!(result_len = result.len(), "Transaction evaluated");
        Ok(result)
    }

    /// Call `stage` and return the base64 payload it issues.
    async fn payload_from<B>(&self, stage: Stage, body: &B) -> RelayResult<String>
    where
        B: Serialize + ?Sized,
    {
        let value = self.gateway.call_for_field(stage, body).await?;
        self.expect_string(stage, value)
    }

    /// Sign the decoded bytes of `payload` and wrap the original text.
    fn sign_payload(&self, role: PayloadRole, payload: String) -> RelayResult<SignedEnvelope> {
        let bytes = codec::decode(&payload).map_err(|source| RelayError::Decode { role, source })?;
        let signature = self
            .key
            .sign(&bytes)
            .map_err(|source| RelayError::Signing { role, source })?;

        tracing::debug!(role = %role, payload_len = bytes.len(), "Payload signed");

        Ok(SignedEnvelope {
            role,
            payload,
            signature,
        })
    }

    fn expect_string(&self, stage: Stage, value: Value) -> RelayResult<String> {
        match value {
            Value::String(text) => Ok(text),
            other => Err(GatewayError::MalformedResponse {
                stage,
                url: self.gateway.stage_url(stage),
                reason: format!(
                    "message.{} is not a string (got {})",
                    stage.response_field(),
                    json_kind(&other)
                ),
            }
            .into()),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
