//! Browser wallet support.
//!
//! Implements the connector for wallets injected into a browser page following
//! [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193). A terminal program cannot reach
//! `window.ethereum` directly, so a local HTTP server bridges the two:
//!
//! 1. the server starts and serves a page on `127.0.0.1`
//! 2. the user opens the page in the browser holding their wallet
//! 3. the page reports whether a wallet is injected and polls for queued requests
//! 4. each request is forwarded to `window.ethereum.request` and the result posted back

use std::{sync::Arc, time::Duration};

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::{Eip1193Provider, ProviderExt, WalletConnector, WalletError};

mod app;
mod handlers;
mod queue;
mod router;
mod server;
mod state;
mod types;

pub use router::SESSION_TOKEN_HEADER;
pub use server::BrowserWalletServer;
pub use types::{BridgeRequest, BridgeResponse, BrowserApiResponse, Connection, ProviderRpcError};

/// Connector for an injected browser wallet, reached through a [`BrowserWalletServer`].
#[derive(Clone, Debug)]
pub struct BrowserConnector {
    server: Arc<BrowserWalletServer>,
    connect_timeout: Duration,
}

impl BrowserConnector {
    /// Starts the bridge server on `port`.
    ///
    /// `connect_timeout` bounds how long the presence check waits for the page to attach,
    /// `request_timeout` how long a single wallet request (including user prompts) may take.
    pub async fn start(
        port: u16,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, WalletError> {
        let server = BrowserWalletServer::start(port, request_timeout).await?;
        Ok(Self::new(server, connect_timeout))
    }

    pub fn new(server: BrowserWalletServer, connect_timeout: Duration) -> Self {
        Self { server: Arc::new(server), connect_timeout }
    }

    pub fn server(&self) -> &BrowserWalletServer {
        &self.server
    }

    pub fn url(&self) -> String {
        self.server.url()
    }
}

#[async_trait]
impl WalletConnector for BrowserConnector {
    async fn is_available(&self) -> bool {
        match self.server.wait_for_connection(self.connect_timeout).await {
            Ok(connection) => connection.has_provider,
            Err(err) => {
                debug!(target: "setprice::browser", %err, "no bridge page attached");
                false
            }
        }
    }

    async fn request_access(&self) -> Result<Vec<Address>, WalletError> {
        let accounts = self.server.request_accounts().await?;
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        Ok(accounts)
    }

    fn provider(&self) -> Arc<dyn Eip1193Provider> {
        self.server.clone()
    }
}
