use crate::{Eip1193Provider, WalletError, WalletSigner};
use alloy_primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

/// Access to the user's wallet.
///
/// This is the capability a page gets from an injected `window.ethereum`, made explicit so the
/// submission flow can be driven by a browser wallet, a development node or a test double.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Whether a wallet is present at all.
    async fn is_available(&self) -> bool;

    /// Asks the wallet for account access, possibly prompting the user.
    ///
    /// Returns the granted accounts; the first one is used to send.
    async fn request_access(&self) -> Result<Vec<Address>, WalletError>;

    /// The provider used to talk to the wallet.
    fn provider(&self) -> Arc<dyn Eip1193Provider>;

    /// Derives a signer for the first of the granted `accounts`.
    fn signer(&self, accounts: &[Address]) -> Result<WalletSigner, WalletError> {
        let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;
        Ok(WalletSigner::new(address, self.provider()))
    }
}
