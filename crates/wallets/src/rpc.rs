//! Wallet connector backed by a JSON-RPC node with unlocked accounts (anvil, hardhat, geth --dev).

use crate::{Eip1193Provider, ProviderExt, WalletConnector, WalletError};
use alloy_primitives::Address;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// An [`Eip1193Provider`] forwarding requests to a JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct RpcProvider {
    client: RpcClient,
}

impl RpcProvider {
    pub fn new(url: Url) -> Self {
        Self { client: ClientBuilder::default().http(url) }
    }
}

#[async_trait]
impl Eip1193Provider for RpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        trace!(target: "setprice::rpc", method, "sending request");
        let res: Result<Value, _> = self.client.request(method.to_string(), params).await;
        Ok(res?)
    }
}

/// Sends from accounts the node manages itself.
///
/// Nodes do not prompt, so account access maps to `eth_accounts`. When a sender is pinned it
/// must be one of the node's accounts.
#[derive(Clone, Debug)]
pub struct RpcConnector {
    provider: Arc<RpcProvider>,
    sender: Option<Address>,
}

impl RpcConnector {
    pub fn new(url: Url, sender: Option<Address>) -> Self {
        Self::with_provider(RpcProvider::new(url), sender)
    }

    pub fn with_provider(provider: RpcProvider, sender: Option<Address>) -> Self {
        Self { provider: Arc::new(provider), sender }
    }
}

#[async_trait]
impl WalletConnector for RpcConnector {
    async fn is_available(&self) -> bool {
        true
    }

    async fn request_access(&self) -> Result<Vec<Address>, WalletError> {
        let accounts = self.provider.accounts().await?;
        match self.sender {
            Some(sender) if accounts.contains(&sender) => Ok(vec![sender]),
            Some(sender) => Err(WalletError::AccountNotGranted(sender)),
            None if accounts.is_empty() => Err(WalletError::NoAccounts),
            None => Ok(accounts),
        }
    }

    fn provider(&self) -> Arc<dyn Eip1193Provider> {
        self.provider.clone()
    }
}
