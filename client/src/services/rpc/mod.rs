//! # JSON-RPC Contract Client
//!
//! [`ContractClient`] over an Ethereum-compatible HTTP JSON-RPC endpoint.
//!
//! - reads: `eth_call` against the `latest` block
//! - writes: `eth_sendTransaction` from the wallet account (an injected or unlocked signer on
//!   the node side), then `eth_getTransactionReceipt` polling until mined or timed out

pub mod abi;

use crate::core::calls::{RawValue, ReadCall, Receipt, TxRequest};
use crate::core::error::{ReadError, TxError};
use crate::core::service::ContractClient;
use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// EIP-1193 "user rejected request".
const USER_REJECTED: i64 = 4001;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    block_number: Option<U64>,
    status: Option<U64>,
}

/// Why a JSON-RPC round trip failed.
#[derive(Debug)]
enum RpcFailure {
    Transport(String),
    Node(RpcErrorObject),
    Decode(String),
}

impl RpcFailure {
    fn into_read_error(self) -> ReadError {
        match self {
            RpcFailure::Transport(msg) => ReadError::Network(msg),
            RpcFailure::Node(err) if is_revert(&err) => ReadError::Reverted(err.message),
            RpcFailure::Node(err) => ReadError::Network(format!("rpc error {}: {}", err.code, err.message)),
            RpcFailure::Decode(msg) => ReadError::Malformed(msg),
        }
    }

    fn into_tx_error(self) -> TxError {
        match self {
            RpcFailure::Transport(msg) | RpcFailure::Decode(msg) => TxError::Network(msg),
            RpcFailure::Node(err) if err.code == USER_REJECTED => TxError::Rejected(err.message),
            RpcFailure::Node(err) if is_revert(&err) => TxError::Reverted(err.message),
            RpcFailure::Node(err) => TxError::Network(format!("rpc error {}: {}", err.code, err.message)),
        }
    }
}

fn is_revert(err: &RpcErrorObject) -> bool {
    err.code == 3 || err.message.contains("execution reverted")
}

/// HTTP JSON-RPC client.
pub struct JsonRpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
    receipt_timeout: Duration,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, receipt_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
            receipt_timeout,
        }
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<R>, RpcFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcFailure::Transport(format!("HTTP {}", response.status())));
        }

        let response: RpcResponse<R> = response
            .json()
            .await
            .map_err(|e| RpcFailure::Decode(e.to_string()))?;

        if let Some(err) = response.error {
            return Err(RpcFailure::Node(err));
        }
        Ok(response.result)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<Receipt, TxError> {
        let started = Instant::now();
        loop {
            let receipt: Option<RpcReceipt> = self
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await
                .map_err(RpcFailure::into_tx_error)?;

            if let Some(receipt) = receipt {
                let block_number = receipt.block_number.map(|n| n.to::<u64>());
                if receipt.status.map(|s| s.is_zero()).unwrap_or(false) {
                    return Err(TxError::Reverted(format!(
                        "{} reverted in block {:?}",
                        receipt.transaction_hash, block_number
                    )));
                }
                return Ok(Receipt {
                    tx_hash: receipt.transaction_hash,
                    block_number,
                });
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(TxError::Timeout(tx_hash.to_string()));
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl ContractClient for JsonRpcClient {
    async fn read(&self, contract: Address, call: ReadCall) -> Result<RawValue, ReadError> {
        let data = Bytes::from(abi::encode_read(&call));
        let start = Instant::now();

        let output: Option<Bytes> = self
            .request("eth_call", json!([{ "to": contract, "data": data }, "latest"]))
            .await
            .map_err(RpcFailure::into_read_error)?;

        debug!(
            contract = %contract,
            method = call.method(),
            duration_ms = start.elapsed().as_millis(),
            "eth_call completed"
        );

        let output = output.ok_or_else(|| ReadError::Malformed("eth_call returned null".into()))?;
        if output.is_empty() {
            // Calls to an address without code succeed with empty output.
            return Err(ReadError::Reverted(format!("{} returned no data", call.method())));
        }
        abi::decode_read(&call, &output)
    }

    async fn write(&self, request: TxRequest) -> Result<Receipt, TxError> {
        let data = Bytes::from(abi::encode_write(&request.call));
        let tx = json!({
            "from": request.sender,
            "to": request.contract,
            "data": data,
        });

        let tx_hash: Option<B256> = self
            .request("eth_sendTransaction", json!([tx]))
            .await
            .map_err(RpcFailure::into_tx_error)?;
        let tx_hash = tx_hash
            .ok_or_else(|| TxError::Network("eth_sendTransaction returned no hash".into()))?;

        info!(
            tx_hash = %tx_hash,
            contract = %request.contract,
            method = request.call.method(),
            "Transaction submitted"
        );

        let receipt = self.wait_for_receipt(tx_hash).await;
        if let Err(e) = &receipt {
            warn!(tx_hash = %tx_hash, error = %e, "Transaction did not settle");
        }
        receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_maps_to_rejected() {
        let failure = RpcFailure::Node(RpcErrorObject {
            code: USER_REJECTED,
            message: "User denied transaction signature".into(),
        });
        assert!(matches!(failure.into_tx_error(), TxError::Rejected(_)));
    }

    #[test]
    fn test_revert_maps_for_reads_and_writes() {
        let revert = || RpcErrorObject {
            code: 3,
            message: "execution reverted: paused".into(),
        };
        assert_eq!(
            RpcFailure::Node(revert()).into_read_error(),
            ReadError::Reverted("execution reverted: paused".into())
        );
        assert!(matches!(RpcFailure::Node(revert()).into_tx_error(), TxError::Reverted(_)));
    }

    #[test]
    fn test_parse_failed_receipt() {
        let receipt: RpcResponse<RpcReceipt> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"result":{
                "transactionHash":"0x0000000000000000000000000000000000000000000000000000000000000001",
                "blockNumber":"0x10",
                "status":"0x0"
            }}"#,
        )
        .unwrap();
        let receipt = receipt.result.unwrap();
        assert_eq!(receipt.block_number.map(|n| n.to::<u64>()), Some(16));
        assert!(receipt.status.unwrap().is_zero());
    }

    #[test]
    fn test_parse_pending_receipt_is_none() {
        let response: RpcResponse<RpcReceipt> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"result":null}"#).unwrap();
        assert!(response.result.is_none());
        assert!(response.error.is_none());
    }
}
