use parking_lot::Mutex;
use tokio::sync::{Notify, futures::Notified};
use uuid::Uuid;

use crate::browser::{
    queue::RequestQueue,
    types::{BridgeRequest, BridgeResponse, Connection},
};

#[derive(Debug)]
pub(crate) struct BrowserWalletState {
    /// What the bridge page last reported, `None` until a page attaches.
    connection: Mutex<Option<Connection>>,
    /// EIP-1193 requests and their responses.
    requests: Mutex<RequestQueue<BridgeRequest, BridgeResponse>>,
    /// Secret embedded in the served page; every API call must present it.
    session_token: String,
    /// Signalled whenever the connection changes or a response arrives.
    changed: Notify,
}

impl Default for BrowserWalletState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserWalletState {
    pub fn new() -> Self {
        Self {
            connection: Mutex::new(None),
            requests: Mutex::new(RequestQueue::new()),
            session_token: Uuid::new_v4().simple().to_string(),
            changed: Notify::new(),
        }
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// A future resolving on the next change. Create it before checking the condition it
    /// waits for, otherwise a change in between is missed.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }

    pub fn connection(&self) -> Option<Connection> {
        self.connection.lock().clone()
    }

    pub fn set_connection(&self, connection: Option<Connection>) {
        *self.connection.lock() = connection;
        self.changed.notify_waiters();
    }

    pub fn add_request(&self, request: BridgeRequest) {
        self.requests.lock().add_request(request.id, request);
    }

    /// Hands the oldest undispatched request to the page.
    pub fn next_request(&self) -> Option<BridgeRequest> {
        self.requests.lock().next_request().cloned()
    }

    /// Drops request `id` and any response to it, e.g. after it timed out.
    pub fn abandon(&self, id: &Uuid) {
        self.requests.lock().abandon(id);
    }

    /// Records the page's answer. Returns `false` if no such request is pending.
    pub fn add_response(&self, response: BridgeResponse) -> bool {
        if !self.requests.lock().add_response(response.id, response) {
            return false;
        }
        self.changed.notify_waiters();
        true
    }

    pub fn take_response(&self, id: &Uuid) -> Option<BridgeResponse> {
        self.requests.lock().get_response(id)
    }
}
