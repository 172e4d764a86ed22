use crate::{Eip1193Provider, Eip1193Transport, PendingTransaction, ProviderExt, WalletError};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use std::{fmt, sync::Arc};

/// An account granted by a wallet, able to send transactions through that wallet.
///
/// Injected wallets sign and broadcast in one step (`eth_sendTransaction`), so this signer
/// never sees a private key.
#[derive(Clone)]
pub struct WalletSigner {
    address: Address,
    provider: Arc<dyn Eip1193Provider>,
}

impl WalletSigner {
    pub fn new(address: Address, provider: Arc<dyn Eip1193Provider>) -> Self {
        Self { address, provider }
    }

    /// Derives a signer from the first account `provider` exposes without prompting.
    pub async fn from_provider(provider: Arc<dyn Eip1193Provider>) -> Result<Self, WalletError> {
        let address = provider.accounts().await?.first().copied().ok_or(WalletError::NoAccounts)?;
        Ok(Self::new(address, provider))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &Arc<dyn Eip1193Provider> {
        &self.provider
    }

    /// Sends `tx` from this account, returning once the wallet has accepted it.
    pub async fn send_transaction(
        &self,
        mut tx: TransactionRequest,
    ) -> Result<PendingTransaction, WalletError> {
        tx.from = Some(self.address);
        let provider = Eip1193Transport::new(self.provider.clone()).into_provider();
        let pending = provider.send_transaction(tx).await?;
        debug!(from = %self.address, hash = %pending.tx_hash(), "transaction accepted by wallet");
        Ok(PendingTransaction::from_builder(pending))
    }
}

impl fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSigner").field("address", &self.address).finish_non_exhaustive()
    }
}
