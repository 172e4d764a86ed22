use crate::{Eip1193Provider, WalletError};
use alloy_primitives::{Address, B256, Bloom, TxHash};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

type Reply = Result<Value, (i64, String)>;

/// A provider answering from per-method scripts.
///
/// Replies for a method are consumed in order; the last one is repeated forever. Methods
/// without a script fail with `-32601`.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScriptedProvider {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl ScriptedProvider {
    pub(crate) fn on(self, method: &str, result: Value) -> Self {
        self.push(method, Ok(result))
    }

    pub(crate) fn on_error(self, method: &str, code: i64, message: &str) -> Self {
        self.push(method, Err((code, message.to_string())))
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, method: &str, reply: Reply) -> Self {
        self.replies.lock().unwrap().entry(method.to_string()).or_default().push_back(reply);
        self
    }
}

#[async_trait]
impl Eip1193Provider for ScriptedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        self.calls.lock().unwrap().push((method.to_string(), params));
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(method) {
                Some(script) if script.len() > 1 => script.pop_front(),
                Some(script) => script.front().cloned(),
                None => None,
            }
        };
        match reply.unwrap_or_else(|| Err((-32601, format!("method {method} not found")))) {
            Ok(value) => Ok(value),
            Err((code, message)) => Err(WalletError::Provider { code, message }),
        }
    }
}

/// An `eth_getBlockByNumber` result (hashes only) holding `transactions`.
pub(crate) fn block(number: u64, transactions: &[TxHash]) -> Value {
    json!({
        "hash": B256::with_last_byte(number as u8),
        "parentHash": B256::ZERO,
        "sha3Uncles": B256::ZERO,
        "miner": Address::ZERO,
        "stateRoot": B256::ZERO,
        "transactionsRoot": B256::ZERO,
        "receiptsRoot": B256::ZERO,
        "logsBloom": Bloom::ZERO,
        "difficulty": "0x0",
        "number": format!("{number:#x}"),
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208",
        "timestamp": "0x0",
        "extraData": "0x",
        "mixHash": B256::ZERO,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x7",
        "uncles": [],
        "transactions": transactions,
    })
}

/// An `eth_getTransactionReceipt` result for `hash`, mined in block `number`.
pub(crate) fn receipt(hash: TxHash, number: u64, success: bool) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": Bloom::ZERO,
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": B256::with_last_byte(number as u8),
        "blockNumber": format!("{number:#x}"),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x7",
        "from": Address::ZERO,
        "to": Address::ZERO,
        "contractAddress": null,
    })
}
