//! Caller-facing relay entry points.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{NetworkId, NetworkProfile, NetworkRegistry, RelayConfig};
use crate::credentials::{CredentialResolver, CredentialSource};
use crate::gateway::{build_http_client, GatewayClient};
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::orchestrator::Pipeline;
use crate::relay::request::{ChaincodeCall, TransactionRequest};
use crate::signer::PrivateKey;

/// Runs submit and evaluate pipelines against the configured networks.
///
/// Cheap to clone; every run resolves credentials afresh and owns its own
/// gateway client, so concurrent runs share nothing mutable.
#[derive(Clone)]
pub struct RelayClient {
    networks: Arc<NetworkRegistry>,
    credentials: Arc<dyn CredentialSource>,
    http: reqwest::Client,
    stage_timeout: Option<Duration>,
}

impl RelayClient {
    pub fn new(
        networks: NetworkRegistry,
        credentials: impl CredentialSource + 'static,
        http: reqwest::Client,
        stage_timeout: Option<Duration>,
    ) -> Self {
        Self {
            networks: Arc::new(networks),
            credentials: Arc::new(credentials),
            http,
            stage_timeout,
        }
    }

    /// Build a client from a validated config.
    ///
    /// Networks without a `[credentials.*]` entry fall back to `fallback`.
    pub fn from_config(
        config: &RelayConfig,
        fallback: impl CredentialSource + 'static,
    ) -> RelayResult<Self> {
        let http = build_http_client(&config.gateway).map_err(RelayError::HttpClient)?;
        let credentials = CredentialResolver::from_config(&config.credentials).with_fallback(fallback);

        Ok(Self::new(
            NetworkRegistry::with_overrides(&config.networks),
            credentials,
            http,
            config.gateway.stage_timeout_secs.map(Duration::from_secs),
        ))
    }

    /// Known networks in display order.
    pub fn networks(&self) -> impl Iterator<Item = (NetworkId, &NetworkProfile)> {
        self.networks.iter()
    }

    pub fn network(&self, id: NetworkId) -> &NetworkProfile {
        self.networks.get(id)
    }

    /// Submit `transaction_name(params)` on `chain_code_name` and return the
    /// committed transaction ID.
    pub async fn submit<I, S>(
        &self,
        network: NetworkId,
        chain_code_name: &str,
        transaction_name: &str,
        params: I,
    ) -> RelayResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.submit_call(network, ChaincodeCall::new(chain_code_name, transaction_name, params))
            .await
    }

    /// Evaluate `transaction_name(params)` on `chain_code_name` without
    /// committing anything.
    pub async fn evaluate<I, S>(
        &self,
        network: NetworkId,
        chain_code_name: &str,
        transaction_name: &str,
        params: I,
    ) -> RelayResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evaluate_call(network, ChaincodeCall::new(chain_code_name, transaction_name, params))
            .await
    }

    /// `Transfer(to_address, amount)` on the network's default chain code.
    ///
    /// `amount` is passed through verbatim in raw units.
    pub async fn transfer(&self, network: NetworkId, to_address: &str, amount: &str) -> RelayResult<String> {
        let chain_code = &self.networks.get(network).chain_code_name;
        self.submit_call(network, ChaincodeCall::transfer(chain_code, to_address, amount))
            .await
    }

    /// `BalanceOf(address)` on the network's default chain code.
    pub async fn balance_of(&self, network: NetworkId, address: &str) -> RelayResult<String> {
        let chain_code = &self.networks.get(network).chain_code_name;
        self.evaluate_call(network, ChaincodeCall::balance_of(chain_code, address))
            .await
    }

    pub async fn submit_call(&self, network: NetworkId, call: ChaincodeCall) -> RelayResult<String> {
        let (gateway, key, request) = self.prepare(network, call)?;
        Pipeline::new(&gateway, &key).submit(request).await
    }

    pub async fn evaluate_call(&self, network: NetworkId, call: ChaincodeCall) -> RelayResult<String> {
        let (gateway, key, request) = self.prepare(network, call)?;
        Pipeline::new(&gateway, &key).evaluate(request).await
    }

    /// Everything a run needs, checked before the first gateway call.
    fn prepare(
        &self,
        network: NetworkId,
        call: ChaincodeCall,
    ) -> RelayResult<(GatewayClient, PrivateKey, TransactionRequest)> {
        let credentials = self.credentials.resolve(network)?;
        let key = PrivateKey::from_pem(credentials.private_key()).map_err(RelayError::Key)?;

        let profile = self.networks.get(network);
        let request = TransactionRequest::new(call, &profile.channel_name, &credentials)?;
        let gateway = GatewayClient::new(self.http.clone(), &profile.gateway_base_url, self.stage_timeout);

        tracing::debug!(
            network = %network,
            gateway = %profile.gateway_base_url,
            enrollment_id = %credentials.enrollment_id(),
            "Prepared pipeline run"
        );

        Ok((gateway, key, request))
    }
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("networks", &self.networks)
            .field("stage_timeout", &self.stage_timeout)
            .finish_non_exhaustive()
    }
}
