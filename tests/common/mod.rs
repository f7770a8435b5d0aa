//! Shared utilities for integration testing: a scriptable JSON-RPC node.
//!
//! Accepted transactions are mined at once: each gets a receipt, and each
//! contract creation gets the next address from [`contract_address`].

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const CHAIN_ID: u64 = 31337;
pub const GAS_PRICE: u64 = 1_000_000_000;

type RpcFailure = (i64, String);

/// Address the node gives the `n`-th contract it creates, starting at 1.
pub fn contract_address(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xc0;
    bytes[19] = n;
    Address::from(bytes)
}

/// A transaction the mock node accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedTx {
    pub nonce: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub chain_id: Option<u64>,
    pub input: Bytes,
}

/// What the node should answer.
#[derive(Debug, Default)]
pub struct NodeScript {
    /// `None` makes `eth_getTransactionCount` fail. Advances with every accepted transaction.
    pub transaction_count: Option<u64>,
    /// Nonces whose raw transactions are rejected with "nonce too low".
    pub reject_nonces: HashSet<u64>,
    /// Nonces that are mined with a failed status.
    pub revert_nonces: HashSet<u64>,
    /// `eth_call` results by function selector. Unlisted calls return empty data.
    pub call_replies: HashMap<[u8; 4], Bytes>,
    /// When set, every `eth_call` fails with this error.
    pub call_error: Option<RpcFailure>,
}

#[derive(Default)]
pub struct MockNode {
    pub script: Mutex<NodeScript>,
    pub received: Mutex<Vec<ReceivedTx>>,
    pub methods: Mutex<Vec<String>>,
    receipts: Mutex<HashMap<B256, Value>>,
    created: Mutex<u8>,
}

impl MockNode {
    pub fn received(&self) -> Vec<ReceivedTx> {
        self.received.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.methods
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }
}

/// Start a mock node on an ephemeral port and return its URL.
pub async fn start_mock_node(script: NodeScript) -> (String, Arc<MockNode>) {
    let node = Arc::new(MockNode {
        script: Mutex::new(script),
        ..MockNode::default()
    });

    let app = Router::new()
        .route("/", post(handle_rpc))
        .with_state(node.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), node)
}

async fn handle_rpc(State(node): State<Arc<MockNode>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    node.methods.lock().unwrap().push(method.clone());
    let params = &request["params"];

    let outcome = match method.as_str() {
        "eth_chainId" => Ok(json!(format!("{:#x}", CHAIN_ID))),
        "eth_gasPrice" => Ok(json!(format!("{:#x}", GAS_PRICE))),
        "eth_blockNumber" => Ok(json!("0x1")),
        "eth_feeHistory" => Ok(json!({
            "oldestBlock": "0x1",
            "baseFeePerGas": [format!("{:#x}", GAS_PRICE), format!("{:#x}", GAS_PRICE)],
            "gasUsedRatio": [0.5],
            "reward": [[format!("{:#x}", GAS_PRICE)]]
        })),
        "eth_getTransactionCount" => match node.script.lock().unwrap().transaction_count {
            Some(count) => Ok(json!(format!("{:#x}", count))),
            None => Err((-32603, "internal error".to_string())),
        },
        "eth_sendRawTransaction" => send_raw(&node, &params[0]),
        "eth_getTransactionReceipt" => Ok(receipt(&node, &params[0])),
        "eth_call" => call(&node, &params[0]),
        other => Err((-32601, format!("method {} not found", other))),
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    })
}

fn send_raw(node: &MockNode, param: &Value) -> Result<Value, RpcFailure> {
    let raw = alloy::hex::decode(param.as_str().unwrap_or_default())
        .map_err(|e| (-32602, e.to_string()))?;
    let envelope =
        TxEnvelope::decode_2718(&mut raw.as_slice()).map_err(|e| (-32602, e.to_string()))?;

    let tx = ReceivedTx {
        nonce: envelope.nonce(),
        to: envelope.to(),
        value: envelope.value(),
        gas_limit: envelope.gas_limit(),
        chain_id: envelope.chain_id(),
        input: envelope.input().clone(),
    };
    node.received.lock().unwrap().push(tx.clone());

    let mut script = node.script.lock().unwrap();
    if script.reject_nonces.contains(&tx.nonce) {
        return Err((-32000, "nonce too low".to_string()));
    }
    if let Some(count) = script.transaction_count.as_mut() {
        *count += 1;
    }
    let succeeded = !script.revert_nonces.contains(&tx.nonce);
    drop(script);

    let tx_hash = keccak256(&raw);
    let status = if succeeded { "0x1" } else { "0x0" };
    let created_address = match (tx.to, succeeded) {
        (None, true) => {
            let mut created = node.created.lock().unwrap();
            *created += 1;
            Some(contract_address(*created))
        }
        _ => None,
    };
    node.receipts.lock().unwrap().insert(
        tx_hash,
        json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0x11),
            "blockNumber": "0x1",
            "gasUsed": "0x5208",
            "effectiveGasPrice": format!("{:#x}", GAS_PRICE),
            "from": Address::ZERO,
            "to": tx.to,
            "contractAddress": created_address,
        }),
    );
    Ok(json!(tx_hash))
}

fn receipt(node: &MockNode, param: &Value) -> Value {
    param
        .as_str()
        .and_then(|hash| hash.parse::<B256>().ok())
        .and_then(|hash| node.receipts.lock().unwrap().get(&hash).cloned())
        .unwrap_or(Value::Null)
}

fn call(node: &MockNode, request: &Value) -> Result<Value, RpcFailure> {
    let script = node.script.lock().unwrap();
    if let Some(error) = &script.call_error {
        return Err(error.clone());
    }
    let input = request["input"]
        .as_str()
        .or_else(|| request["data"].as_str())
        .and_then(|hex| alloy::hex::decode(hex).ok())
        .unwrap_or_default();
    let reply = input
        .get(..4)
        .and_then(|selector| <[u8; 4]>::try_from(selector).ok())
        .and_then(|selector| script.call_replies.get(&selector).cloned())
        .unwrap_or_default();
    Ok(json!(reply))
}
