//! Transaction requests and the proposal wire body.

use serde::Serialize;

use crate::credentials::Credentials;
use crate::relay::error::{RelayError, RelayResult};

/// Chain code transaction moving tokens: `[to_address, amount]`.
pub const TRANSFER_TRANSACTION: &str = "Transfer";

/// Chain code query returning an address balance: `[address]`.
pub const BALANCE_OF_TRANSACTION: &str = "BalanceOf";

/// What to invoke on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeCall {
    pub chain_code_name: String,
    pub transaction_name: String,
    /// Positional parameters, passed through in order.
    pub params: Vec<String>,
}

impl ChaincodeCall {
    pub fn new<I, S>(chain_code_name: impl Into<String>, transaction_name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chain_code_name: chain_code_name.into(),
            transaction_name: transaction_name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// `Transfer(to_address, amount)` on `chain_code_name`.
    pub fn transfer(chain_code_name: &str, to_address: &str, amount: &str) -> Self {
        Self::new(chain_code_name, TRANSFER_TRANSACTION, [to_address, amount])
    }

    /// `BalanceOf(address)` on `chain_code_name`.
    pub fn balance_of(chain_code_name: &str, address: &str) -> Self {
        Self::new(chain_code_name, BALANCE_OF_TRANSACTION, [address])
    }
}

/// A fully resolved request, consumed by exactly one pipeline run.
#[derive(Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    chain_code_name: String,
    transaction_name: String,
    params: Vec<String>,
    channel_name: String,
    enrollment_id: String,
    cert: String,
}

impl TransactionRequest {
    /// Bind `call` to a channel and caller identity.
    ///
    /// Names are passed to the gateway exactly as given; only blank names
    /// are rejected.
    pub fn new(call: ChaincodeCall, channel_name: &str, credentials: &Credentials) -> RelayResult<Self> {
        if call.chain_code_name.trim().is_empty() {
            return Err(RelayError::InvalidRequest("chain code name is empty".to_string()));
        }
        if call.transaction_name.trim().is_empty() {
            return Err(RelayError::InvalidRequest("transaction name is empty".to_string()));
        }
        if channel_name.trim().is_empty() {
            return Err(RelayError::InvalidRequest("channel name is empty".to_string()));
        }

        Ok(Self {
            chain_code_name: call.chain_code_name,
            transaction_name: call.transaction_name,
            params: call.params,
            channel_name: channel_name.to_string(),
            enrollment_id: credentials.enrollment_id().to_string(),
            cert: credentials.cert().to_string(),
        })
    }

    pub fn chain_code_name(&self) -> &str {
        &self.chain_code_name
    }

    pub fn transaction_name(&self) -> &str {
        &self.transaction_name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn enrollment_id(&self) -> &str {
        &self.enrollment_id
    }

    /// Body of the `proposal` stage.
    pub fn proposal_body(&self) -> ProposalBody<'_> {
        ProposalBody {
            enrollment_id: &self.enrollment_id,
            cert: &self.cert,
            channel_name: &self.channel_name,
            chain_code_name: &self.chain_code_name,
            transaction_name: &self.transaction_name,
            transaction_params: &self.params,
        }
    }
}

impl std::fmt::Debug for TransactionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionRequest")
            .field("chain_code_name", &self.chain_code_name)
            .field("transaction_name", &self.transaction_name)
            .field("params", &self.params)
            .field("channel_name", &self.channel_name)
            .field("enrollment_id", &self.enrollment_id)
            .field("cert", &"<omitted>")
            .finish()
    }
}

/// Wire body of the proposal stage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalBody<'a> {
    #[serde(rename = "enrollmentID")]
    pub enrollment_id: &'a str,
    pub cert: &'a str,
    pub channel_name: &'a str,
    pub chain_code_name: &'a str,
    pub transaction_name: &'a str,
    pub transaction_params: &'a [String],
}
