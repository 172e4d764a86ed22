use crate::WalletError;
use alloy_primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// What the bridge page found in the browser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Whether `window.ethereum` is injected.
    pub has_provider: bool,
    /// Accounts exposed without prompting (`eth_accounts`).
    #[serde(default)]
    pub accounts: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
}

impl Connection {
    pub fn new(accounts: Vec<Address>, chain_id: ChainId) -> Self {
        Self { has_provider: true, accounts, chain_id: Some(chain_id) }
    }

    /// A page without an injected wallet.
    pub fn without_provider() -> Self {
        Self::default()
    }
}

/// An EIP-1193 request waiting to be forwarded to `window.ethereum`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub id: Uuid,
    pub method: String,
    pub params: Value,
}

/// The outcome of a [`BridgeRequest`] as reported by the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderRpcError>,
}

impl BridgeResponse {
    pub fn ok(id: Uuid, result: Value) -> Self {
        Self { id, result: Some(result), error: None }
    }

    pub fn err(id: Uuid, code: i64, message: impl Into<String>) -> Self {
        Self { id, result: None, error: Some(ProviderRpcError { code, message: message.into() }) }
    }

    pub(crate) fn into_result(self) -> Result<Value, WalletError> {
        match self.error {
            Some(ProviderRpcError { code, message }) => Err(WalletError::Provider { code, message }),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// The `ProviderRpcError` shape thrown by `window.ethereum.request`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

/// Envelope of every bridge API response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum BrowserApiResponse<T = ()> {
    Ok(T),
    Error { message: String },
}

impl<T> BrowserApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}
