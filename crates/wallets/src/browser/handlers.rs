use std::sync::Arc;

use axum::{Json, extract::State, response::Html};

use crate::browser::{
    app,
    state::BrowserWalletState,
    types::{BridgeRequest, BridgeResponse, BrowserApiResponse, Connection},
};

pub(crate) async fn serve_index(State(state): State<Arc<BrowserWalletState>>) -> Html<String> {
    Html(app::index_html(state.session_token()))
}

pub(crate) async fn get_connection(
    State(state): State<Arc<BrowserWalletState>>,
) -> Json<BrowserApiResponse<Option<Connection>>> {
    Json(BrowserApiResponse::Ok(state.connection()))
}

pub(crate) async fn post_connection(
    State(state): State<Arc<BrowserWalletState>>,
    Json(connection): Json<Option<Connection>>,
) -> Json<BrowserApiResponse> {
    match &connection {
        Some(conn) => debug!(
            target: "setprice::browser",
            has_provider = conn.has_provider,
            accounts = conn.accounts.len(),
            chain_id = ?conn.chain_id,
            "page connected"
        ),
        None => debug!(target: "setprice::browser", "page disconnected"),
    }
    state.set_connection(connection);
    Json(BrowserApiResponse::Ok(()))
}

pub(crate) async fn get_next_request(
    State(state): State<Arc<BrowserWalletState>>,
) -> Json<BrowserApiResponse<BridgeRequest>> {
    match state.next_request() {
        Some(request) => Json(BrowserApiResponse::Ok(request)),
        None => Json(BrowserApiResponse::error("No pending request")),
    }
}

pub(crate) async fn post_response(
    State(state): State<Arc<BrowserWalletState>>,
    Json(response): Json<BridgeResponse>,
) -> Json<BrowserApiResponse> {
    let id = response.id;
    if state.add_response(response) {
        trace!(target: "setprice::browser", %id, "response received");
        Json(BrowserApiResponse::Ok(()))
    } else {
        Json(BrowserApiResponse::error("Unknown request id"))
    }
}
