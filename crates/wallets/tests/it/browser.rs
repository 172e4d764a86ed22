use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, address};
use serde_json::json;
use setprice_wallets::{
    BrowserConnector, DISCONNECTED, Eip1193Provider, ProviderExt, USER_REJECTED_REQUEST,
    WalletConnector, WalletError,
    browser::{BridgeResponse, BrowserApiResponse, BrowserWalletServer, Connection, SESSION_TOKEN_HEADER},
};

use crate::utils::TestPage;

const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

async fn server(request_timeout: Duration) -> Arc<BrowserWalletServer> {
    crate::init_tracing();
    Arc::new(BrowserWalletServer::start(0, request_timeout).await.unwrap())
}

#[tokio::test]
async fn serves_page_with_session_token() {
    let server = server(Duration::from_secs(5)).await;
    assert_ne!(server.port(), 0);

    let html = reqwest::get(server.url()).await.unwrap().text().await.unwrap();
    assert!(html.contains(server.session_token()));
    assert!(html.contains("window.ethereum"));
}

#[tokio::test]
async fn api_requires_session_token() {
    let server = server(Duration::from_secs(5)).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/request", server.url());

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    let resp = client.get(&url).header(SESSION_TOKEN_HEADER, "wrong").send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    let resp = client.get(&url).header(SESSION_TOKEN_HEADER, server.session_token()).send().await;
    assert_eq!(resp.unwrap().status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn tracks_connection() {
    let server = server(Duration::from_secs(5)).await;
    let page = TestPage::new(&server);
    assert!(!server.is_connected());

    page.connect(Some(Connection::new(vec![ALICE], 1))).await;
    let connection = server.connection().expect("expected a page connection");
    assert!(connection.has_provider);
    assert_eq!(connection.accounts, vec![ALICE]);
    assert_eq!(connection.chain_id, Some(1));

    page.connect(None).await;
    assert!(!server.is_connected());
}

#[tokio::test]
async fn no_pending_request() {
    let server = server(Duration::from_secs(5)).await;
    let page = TestPage::new(&server);

    let BrowserApiResponse::Error { message } = page.poll_request().await else {
        panic!("expected an empty queue");
    };
    assert_eq!(message, "No pending request");
}

#[tokio::test]
async fn relays_request_result() {
    let server = server(Duration::from_secs(5)).await;
    let page = TestPage::new(&server);
    page.connect(Some(Connection::new(vec![], 31337))).await;

    let provider = server.clone();
    let handle = tokio::spawn(async move { provider.request_accounts().await });

    let request = page.next_request().await;
    assert_eq!(request.method, "eth_requestAccounts");
    assert_eq!(request.params, json!([]));

    let resp = page.respond(&BridgeResponse::ok(request.id, json!([ALICE]))).await;
    assert_eq!(resp, BrowserApiResponse::Ok(()));

    let accounts = handle.await.expect("task panicked").unwrap();
    assert_eq!(accounts, vec![ALICE]);

    // answered requests leave the queue
    assert!(matches!(page.poll_request().await, BrowserApiResponse::Error { .. }));
}

#[tokio::test]
async fn dispatched_request_is_served_once() {
    let server = server(Duration::from_secs(5)).await;
    let page = TestPage::new(&server);
    page.connect(Some(Connection::new(vec![ALICE], 1))).await;

    let provider = server.clone();
    let handle = tokio::spawn(async move { provider.chain_id().await });

    let request = page.next_request().await;
    assert_eq!(request.method, "eth_chainId");
    assert!(matches!(page.poll_request().await, BrowserApiResponse::Error { .. }));

    let resp = page.respond(&BridgeResponse::ok(request.id, json!("0x1"))).await;
    assert_eq!(resp, BrowserApiResponse::Ok(()));
    assert_eq!(handle.await.expect("task panicked").unwrap(), 1);
}

#[tokio::test]
async fn relays_wallet_rejection() {
    let server = server(Duration::from_secs(5)).await;
    let page = TestPage::new(&server);
    page.connect(Some(Connection::new(vec![ALICE], 1))).await;

    let provider = server.clone();
    let handle = tokio::spawn(async move {
        provider.request("eth_sendTransaction", json!([{ "from": ALICE }])).await
    });

    let request = page.next_request().await;
    assert_eq!(request.method, "eth_sendTransaction");
    page.respond(&BridgeResponse::err(
        request.id,
        USER_REJECTED_REQUEST,
        "User rejected the request.",
    ))
    .await;

    let err = handle.await.expect("task panicked").unwrap_err();
    assert!(err.is_user_rejection(), "{err:?}");
    assert_eq!(err.to_string(), "User rejected the request.");
}

#[tokio::test]
async fn rejects_unknown_response() {
    let server = server(Duration::from_secs(5)).await;
    let page = TestPage::new(&server);

    let resp = page.respond(&BridgeResponse::ok(uuid::Uuid::new_v4(), json!(null))).await;
    let BrowserApiResponse::Error { message } = resp else {
        panic!("expected error response");
    };
    assert_eq!(message, "Unknown request id");
}

#[tokio::test]
async fn rejects_malformed_response() {
    let server = server(Duration::from_secs(5)).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/response", server.url()))
        .header(SESSION_TOKEN_HEADER, server.session_token())
        .header("Content-Type", "application/json")
        .body(r#"{ "id": "invalid-uuid", "result": "0x1" }"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn request_without_page_fails() {
    let server = server(Duration::from_secs(5)).await;
    let err = server.chain_id().await.unwrap_err();
    assert!(matches!(err, WalletError::NotConnected), "{err:?}");
}

#[tokio::test]
async fn request_times_out() {
    let server = server(Duration::from_millis(200)).await;
    let page = TestPage::new(&server);
    page.connect(Some(Connection::new(vec![ALICE], 1))).await;

    let err = server.chain_id().await.unwrap_err();
    assert!(matches!(err, WalletError::Timeout { operation: "wallet request", .. }), "{err:?}");

    // the abandoned request is not served to the page anymore
    assert!(matches!(page.poll_request().await, BrowserApiResponse::Error { .. }));
}

#[tokio::test]
async fn late_response_is_rejected() {
    let server = server(Duration::from_millis(200)).await;
    let page = TestPage::new(&server);
    page.connect(Some(Connection::new(vec![ALICE], 1))).await;

    let provider = server.clone();
    let handle = tokio::spawn(async move { provider.chain_id().await });
    let request = page.next_request().await;

    let err = handle.await.expect("task panicked").unwrap_err();
    assert!(matches!(err, WalletError::Timeout { .. }), "{err:?}");

    let resp = page.respond(&BridgeResponse::ok(request.id, json!("0x1"))).await;
    let BrowserApiResponse::Error { message } = resp else {
        panic!("expected the late response to be rejected");
    };
    assert_eq!(message, "Unknown request id");
}

#[tokio::test]
async fn connector_presence_follows_page() {
    let connector = BrowserConnector::start(0, Duration::from_secs(5), Duration::from_secs(5))
        .await
        .unwrap();
    let page = TestPage::new(connector.server());

    page.connect(Some(Connection::without_provider())).await;
    assert!(!connector.is_available().await);

    page.connect(Some(Connection::new(vec![], 1))).await;
    assert!(connector.is_available().await);
}

#[tokio::test]
async fn connector_waits_for_page() {
    let connector = BrowserConnector::start(0, Duration::from_secs(5), Duration::from_secs(5))
        .await
        .unwrap();
    let page = TestPage::new(connector.server());

    let check = {
        let connector = connector.clone();
        tokio::spawn(async move { connector.is_available().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    page.connect(Some(Connection::new(vec![ALICE], 1))).await;

    assert!(check.await.expect("task panicked"));
}

#[tokio::test]
async fn connector_unavailable_without_page() {
    let connector = BrowserConnector::start(0, Duration::from_millis(100), Duration::from_secs(5))
        .await
        .unwrap();
    assert!(!connector.is_available().await);
}

#[tokio::test]
async fn connector_request_access() {
    let connector = BrowserConnector::start(0, Duration::from_secs(5), Duration::from_secs(5))
        .await
        .unwrap();
    let page = TestPage::new(connector.server());
    page.connect(Some(Connection::new(vec![], 1))).await;

    let access = {
        let connector = connector.clone();
        tokio::spawn(async move { connector.request_access().await })
    };
    let request = page.next_request().await;
    page.respond(&BridgeResponse::ok(request.id, json!([ALICE]))).await;
    assert_eq!(access.await.expect("task panicked").unwrap(), vec![ALICE]);

    let signer = connector.signer(&[ALICE]).unwrap();
    assert_eq!(signer.address(), ALICE);
}

#[tokio::test]
async fn connector_access_without_wallet_reports_page_error() {
    let connector = BrowserConnector::start(0, Duration::from_secs(5), Duration::from_secs(5))
        .await
        .unwrap();
    let page = TestPage::new(connector.server());
    page.connect(Some(Connection::without_provider())).await;

    let access = {
        let connector = connector.clone();
        tokio::spawn(async move { connector.request_access().await })
    };
    let request = page.next_request().await;
    page.respond(&BridgeResponse::err(request.id, DISCONNECTED, "No injected wallet found")).await;

    let err = access.await.expect("task panicked").unwrap_err();
    assert!(matches!(err, WalletError::Provider { code: DISCONNECTED, .. }), "{err:?}");
}
