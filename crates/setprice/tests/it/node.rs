//! A development node with unlocked accounts, mining every transaction into block 1.

use std::{
    net::Ipv4Addr,
    sync::{Arc, Mutex},
};

use alloy_primitives::{Address, B256, Bloom, Bytes, TxHash, address, b256};
use axum::{Json, Router, extract::State, routing::post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const HASH: TxHash =
    b256!("0x3b1ce1f1c4b2cbe5a2a1f5d6e0c9a8b7f6e5d4c3b2a19080706050403020100f");
const BLOCK_HASH: B256 =
    b256!("0x0101010101010101010101010101010101010101010101010101010101010101");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Behavior {
    #[default]
    Succeed,
    Revert,
    RejectSend,
}

#[derive(Debug, Default)]
pub struct Node {
    behavior: Behavior,
    sent: Mutex<Vec<Value>>,
}

impl Node {
    pub async fn spawn(behavior: Behavior) -> (Arc<Self>, Url) {
        let node = Arc::new(Self { behavior, ..Default::default() });
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let router = Router::new().route("/", post(handle)).with_state(node.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (node, format!("http://127.0.0.1:{port}").parse().unwrap())
    }

    /// Transactions received through `eth_sendTransaction`.
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    /// Calldata of the `n`th sent transaction.
    pub fn input(&self, n: usize) -> Bytes {
        serde_json::from_value(self.sent()[n]["input"].clone()).unwrap()
    }

    fn answer(&self, method: &str, params: &Value) -> Result<Value, (i64, &'static str)> {
        match method {
            "eth_accounts" => Ok(json!([ALICE])),
            "eth_chainId" => Ok(json!("0x7a69")),
            "eth_blockNumber" => Ok(json!("0x1")),
            "eth_sendTransaction" => {
                if self.behavior == Behavior::RejectSend {
                    return Err((-32000, "insufficient funds for gas * price + value"));
                }
                self.sent.lock().unwrap().push(params[0].clone());
                Ok(json!(HASH))
            }
            "eth_getTransactionReceipt" => Ok(json!({
                "type": "0x2",
                "status": if self.behavior == Behavior::Revert { "0x0" } else { "0x1" },
                "cumulativeGasUsed": "0x5208",
                "logs": [],
                "logsBloom": Bloom::ZERO,
                "transactionHash": HASH,
                "transactionIndex": "0x0",
                "blockHash": BLOCK_HASH,
                "blockNumber": "0x1",
                "gasUsed": "0x5208",
                "effectiveGasPrice": "0x7",
                "from": ALICE,
                "to": CONTRACT,
                "contractAddress": null,
            })),
            "eth_getBlockByNumber" => {
                let mined = if self.sent.lock().unwrap().is_empty() { vec![] } else { vec![HASH] };
                Ok(json!({
                    "hash": BLOCK_HASH,
                    "parentHash": B256::ZERO,
                    "sha3Uncles": B256::ZERO,
                    "miner": Address::ZERO,
                    "stateRoot": B256::ZERO,
                    "transactionsRoot": B256::ZERO,
                    "receiptsRoot": B256::ZERO,
                    "logsBloom": Bloom::ZERO,
                    "difficulty": "0x0",
                    "number": "0x1",
                    "gasLimit": "0x1c9c380",
                    "gasUsed": "0x5208",
                    "timestamp": "0x0",
                    "extraData": "0x",
                    "mixHash": B256::ZERO,
                    "nonce": "0x0000000000000000",
                    "baseFeePerGas": "0x7",
                    "uncles": [],
                    "transactions": mined,
                }))
            }
            _ => Err((-32601, "method not found")),
        }
    }
}

async fn handle(State(node): State<Arc<Node>>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let method = req["method"].as_str().unwrap_or_default();
    Json(match node.answer(method, &req["params"]) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
        }
    })
}
