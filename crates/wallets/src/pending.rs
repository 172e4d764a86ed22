//! Tracking a submitted transaction until it is confirmed.

use crate::{Eip1193Provider, Eip1193Transport, WalletError};
use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::TxHash;
use alloy_provider::{PendingTransactionBuilder, PendingTransactionError, Provider, WatchTxError};
use alloy_rpc_types::TransactionReceipt;
use std::{fmt, sync::Arc, time::Duration};

/// How long and how often to wait for a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationSettings {
    /// Blocks required on top of (and including) the inclusion block.
    pub confirmations: u64,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ConfirmationSettings {
    /// Upper bound on [`confirmations`](Self::confirmations).
    pub const MAX_CONFIRMATIONS: u64 = 1_000;
}

impl Default for ConfirmationSettings {
    fn default() -> Self {
        Self { confirmations: 1, timeout: Duration::from_secs(120), poll_interval: Duration::from_secs(1) }
    }
}

/// A transaction accepted by the wallet but not yet confirmed.
#[must_use = "a pending transaction does nothing unless watched"]
pub struct PendingTransaction {
    builder: PendingTransactionBuilder<Ethereum>,
    settings: ConfirmationSettings,
}

impl PendingTransaction {
    /// Tracks `hash` through `provider`.
    pub fn new(hash: TxHash, provider: Arc<dyn Eip1193Provider>) -> Self {
        let provider = Eip1193Transport::new(provider).into_provider();
        Self::from_builder(PendingTransactionBuilder::new(provider, hash))
    }

    pub fn from_builder(builder: PendingTransactionBuilder<Ethereum>) -> Self {
        Self { builder, settings: ConfirmationSettings::default() }
    }

    pub fn with_settings(mut self, settings: ConfirmationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.settings.confirmations = confirmations;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.settings.poll_interval = poll_interval;
        self
    }

    pub fn tx_hash(&self) -> TxHash {
        *self.builder.tx_hash()
    }

    pub fn settings(&self) -> &ConfirmationSettings {
        &self.settings
    }

    /// The confirmations actually waited for: at least one, at most
    /// [`ConfirmationSettings::MAX_CONFIRMATIONS`].
    pub fn required_confirmations(&self) -> u64 {
        self.settings.confirmations.clamp(1, ConfirmationSettings::MAX_CONFIRMATIONS)
    }

    /// Waits until the transaction is mined with the required confirmations.
    ///
    /// Fails with [`WalletError::Reverted`] if the receipt reports a failed execution and with
    /// [`WalletError::Timeout`] if the configured timeout elapses first.
    pub async fn watch(self) -> Result<TransactionReceipt, WalletError> {
        let hash = self.tx_hash();
        let confirmations = self.required_confirmations();
        let ConfirmationSettings { timeout, poll_interval, .. } = self.settings;
        self.builder.provider().client().set_poll_interval(poll_interval);

        let receipt = self
            .builder
            .with_required_confirmations(confirmations)
            .with_timeout(Some(timeout))
            .get_receipt()
            .await
            .map_err(|err| match err {
                PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
                    WalletError::Timeout { operation: "transaction confirmation", timeout }
                }
                PendingTransactionError::TransportError(err) => err.into(),
                err => WalletError::Pending(err),
            })?;
        debug!(%hash, block = ?receipt.block_number, "transaction mined");

        if !ReceiptResponse::status(&receipt) {
            return Err(WalletError::Reverted(hash));
        }
        Ok(receipt)
    }
}

impl fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", self.builder.tx_hash())
            .field("settings", &self.settings)
            .finish()
    }
}
