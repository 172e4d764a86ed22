//! Issuing the price update and tracking its confirmation.

use crate::{
    method::PriceMethod,
    price::{Price, PriceError},
};
use alloy_primitives::TxHash;
use async_trait::async_trait;
use setprice_config::Config;
use setprice_wallets::{ConfirmationSettings, PendingTransaction, WalletSigner};
use std::time::Duration;

/// A call accepted by the wallet, awaiting confirmation.
#[async_trait]
pub trait PendingCall: Send {
    fn tx_hash(&self) -> TxHash;

    /// Resolves once the network confirms the call.
    async fn wait(self: Box<Self>) -> eyre::Result<()>;
}

#[async_trait]
impl PendingCall for PendingTransaction {
    fn tx_hash(&self) -> TxHash {
        Self::tx_hash(self)
    }

    async fn wait(self: Box<Self>) -> eyre::Result<()> {
        let receipt = (*self).watch().await?;
        debug!(hash = %receipt.transaction_hash, block = ?receipt.block_number, "price update confirmed");
        Ok(())
    }
}

/// Encodes and submits a price to the remote method.
#[async_trait]
pub trait TransactionRequester: Send + Sync {
    /// Checks that `price` can be encoded for the remote method.
    ///
    /// Runs before the wallet is involved.
    fn validate(&self, price: Price) -> Result<Price, PriceError> {
        Ok(price)
    }

    /// Sends `price` from `signer`, returning once the wallet has accepted the call.
    async fn call(&self, signer: &WalletSigner, price: Price) -> eyre::Result<Box<dyn PendingCall>>;
}

/// Calls a [`PriceMethod`] through the user's wallet.
#[derive(Clone, Debug)]
pub struct ContractRequester {
    method: PriceMethod,
    settings: ConfirmationSettings,
}

impl ContractRequester {
    pub fn new(method: PriceMethod, settings: ConfirmationSettings) -> Self {
        Self { method, settings }
    }

    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let method = PriceMethod::from_config(config)?;
        eyre::ensure!(
            config.confirmations <= ConfirmationSettings::MAX_CONFIRMATIONS,
            "`confirmations` must be at most {}, got {}",
            ConfirmationSettings::MAX_CONFIRMATIONS,
            config.confirmations
        );
        let settings = ConfirmationSettings {
            confirmations: config.confirmations.max(1),
            timeout: Duration::from_secs(config.transaction_timeout),
            poll_interval: Duration::from_millis(config.poll_interval),
        };
        Ok(Self::new(method, settings))
    }

    pub fn method(&self) -> &PriceMethod {
        &self.method
    }

    pub fn settings(&self) -> &ConfirmationSettings {
        &self.settings
    }
}

#[async_trait]
impl TransactionRequester for ContractRequester {
    fn validate(&self, price: Price) -> Result<Price, PriceError> {
        self.method.check(price)
    }

    async fn call(&self, signer: &WalletSigner, price: Price) -> eyre::Result<Box<dyn PendingCall>> {
        let tx = self.method.transaction(price)?;
        trace!(to = %self.method.target(), method = %self.method.signature(), %price, "sending price update");
        let pending = signer.send_transaction(tx).await?.with_settings(self.settings);
        Ok(Box::new(pending))
    }
}
