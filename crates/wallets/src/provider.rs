//! The EIP-1193 request primitive and typed helpers on top of it.

use crate::WalletError;
use alloy_primitives::{Address, U64};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;

/// A wallet provider speaking [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193).
///
/// This is the `request({ method, params })` function injected wallets expose as
/// `window.ethereum`; everything else is built on top of it.
#[async_trait]
pub trait Eip1193Provider: Send + Sync + fmt::Debug {
    /// Sends a single request and returns its raw JSON result.
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError>;
}

/// Typed wrappers around the wallet-specific requests.
///
/// Chain reads and confirmation tracking go through alloy's
/// [`Provider`](alloy_provider::Provider) on top of an
/// [`Eip1193Transport`](crate::Eip1193Transport).
#[async_trait]
pub trait ProviderExt: Eip1193Provider {
    /// `eth_requestAccounts`: asks the user to grant account access.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let method = "eth_requestAccounts";
        decode(method, self.request(method, json!([])).await?)
    }

    /// `eth_accounts`: accounts already available without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        let method = "eth_accounts";
        decode(method, self.request(method, json!([])).await?)
    }

    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, WalletError> {
        let method = "eth_chainId";
        decode::<U64>(method, self.request(method, json!([])).await?).map(|id| id.to())
    }
}

impl<P: Eip1193Provider + ?Sized> ProviderExt for P {}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, WalletError> {
    serde_json::from_value(value)
        .map_err(|source| WalletError::InvalidResponse { method: method.to_string(), source })
}
