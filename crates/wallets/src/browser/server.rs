use std::{net::Ipv4Addr, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};
use uuid::Uuid;

use crate::{
    Eip1193Provider, WalletError,
    browser::{
        router::build_router,
        state::BrowserWalletState,
        types::{BridgeRequest, Connection},
    },
};

/// Local HTTP server relaying EIP-1193 requests to a wallet injected in a browser tab.
///
/// The served page polls for queued requests, forwards them to `window.ethereum` and posts the
/// results back. The server runs until [`stop`](Self::stop) is called or it is dropped.
#[derive(Debug)]
pub struct BrowserWalletServer {
    port: u16,
    state: Arc<BrowserWalletState>,
    request_timeout: Duration,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl BrowserWalletServer {
    /// Binds to `127.0.0.1:port` (`0` picks a free port) and starts serving.
    pub async fn start(port: u16, request_timeout: Duration) -> Result<Self, WalletError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port)).await?;
        let port = listener.local_addr()?.port();

        let state = Arc::new(BrowserWalletState::new());
        let router = build_router(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                error!(target: "setprice::browser", %err, "browser wallet server failed");
            }
        });
        debug!(target: "setprice::browser", port, "browser wallet server started");

        Ok(Self { port, state, request_timeout, shutdown: Mutex::new(Some(shutdown_tx)) })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address of the bridge page.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn session_token(&self) -> &str {
        self.state.session_token()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn connection(&self) -> Option<Connection> {
        self.state.connection()
    }

    /// Waits for the bridge page to report in.
    pub async fn wait_for_connection(&self, timeout: Duration) -> Result<Connection, WalletError> {
        let wait = async {
            loop {
                let changed = self.state.changed();
                if let Some(connection) = self.state.connection() {
                    return connection;
                }
                changed.await;
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| WalletError::Timeout { operation: "browser connection", timeout })
    }

    /// Stops serving. Pending requests keep waiting until they time out.
    pub fn stop(&self) {
        if let Some(tx) = self.shutdown.lock().take() {
            let _ = tx.send(());
            debug!(target: "setprice::browser", port = self.port, "browser wallet server stopped");
        }
    }

    async fn wait_for_response(&self, id: Uuid) -> Result<Value, WalletError> {
        loop {
            let changed = self.state.changed();
            if let Some(response) = self.state.take_response(&id) {
                return response.into_result();
            }
            changed.await;
        }
    }
}

impl Drop for BrowserWalletServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[async_trait]
impl Eip1193Provider for BrowserWalletServer {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::NotConnected);
        }

        let id = Uuid::new_v4();
        trace!(target: "setprice::browser", %id, method, "queueing request");
        self.state.add_request(BridgeRequest { id, method: method.to_string(), params });

        let timeout = self.request_timeout;
        match tokio::time::timeout(timeout, self.wait_for_response(id)).await {
            Ok(res) => res,
            Err(_) => {
                self.state.abandon(&id);
                Err(WalletError::Timeout { operation: "wallet request", timeout })
            }
        }
    }
}
