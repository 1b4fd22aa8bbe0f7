//! # coffer-rpc
//!
//! Minimal, blocking JSON-RPC 2.0 client for EVM HTTP endpoints.
//! Methods used:
//! - `eth_chainId`
//! - `eth_getBalance`
//! - `eth_getTransactionCount`
//! - `eth_call`
//! - `eth_sendRawTransaction`
//!
//! No retries and no failover: a failed request surfaces as an error and
//! the caller decides what to do with it.

use std::time::Duration;

use alloy_primitives::U256;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use coffer_evm::client::{ChainClient, ClientError};
use coffer_evm::transaction::SignedTransaction;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("url parse: {0}")]
    Url(#[from] url::ParseError),
    #[error("rpc returned error: {method} code={code} message={message}")]
    Node {
        method: String,
        code: i64,
        message: String,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Blocking JSON-RPC client for one EVM node endpoint.
#[derive(Clone)]
pub struct HttpRpcClient {
    url: Url,
    client: Client,
}

impl HttpRpcClient {
    /// Creates a client for `endpoint` like `http://127.0.0.1:8545`.
    pub fn new(endpoint: &str) -> Result<Self, RpcError> {
        let url = Url::parse(endpoint)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .default_headers(headers)
            .build()?;

        Ok(Self { url, client })
    }

    fn call<R>(&self, method: &str, params: Value) -> Result<R, RpcError>
    where
        R: for<'de> Deserialize<'de>,
    {
        #[derive(Serialize)]
        struct Request<'a> {
            jsonrpc: &'a str,
            id: u64,
            method: &'a str,
            params: Value,
        }

        #[derive(Deserialize)]
        struct Envelope<T> {
            result: Option<T>,
            error: Option<RpcErrorDetail>,
        }

        #[derive(Deserialize)]
        struct RpcErrorDetail {
            code: i64,
            message: String,
        }

        let request = Request {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        tracing::debug!(%method, url = %self.url, "json-rpc request");

        let resp = self.client.post(self.url.clone()).json(&request).send()?;
        if !resp.status().is_success() {
            return Err(RpcError::Protocol(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        let envelope: Envelope<R> = resp.json()?;
        if let Some(err) = envelope.error {
            tracing::debug!(%method, code = err.code, message = %err.message, "json-rpc node error");
            return Err(RpcError::Node {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| RpcError::Protocol(format!("{method} missing result")))
    }

    /// `eth_chainId`.
    pub fn chain_id(&self) -> Result<u64, RpcError> {
        let result: String = self.call("eth_chainId", json!([]))?;
        parse_quantity_u64(&result)
    }

    /// `eth_getBalance` at the latest block, in wei.
    pub fn balance(&self, address: &str) -> Result<U256, RpcError> {
        let result: String = self.call("eth_getBalance", json!([address, "latest"]))?;
        parse_quantity_u256(&result)
    }

    /// `eth_getTransactionCount` with the `pending` tag, so back-to-back
    /// sends in one run see their own queued transactions.
    pub fn nonce(&self, address: &str) -> Result<u64, RpcError> {
        let result: String = self.call("eth_getTransactionCount", json!([address, "pending"]))?;
        parse_quantity_u64(&result)
    }

    /// `eth_call` against the latest block; returns the raw return data.
    pub fn call_contract(&self, contract: &str, calldata: &[u8]) -> Result<Vec<u8>, RpcError> {
        let tx = json!({
            "to": contract,
            "data": format!("0x{}", hex::encode(calldata)),
        });
        let result: String = self.call("eth_call", json!([tx, "latest"]))?;
        parse_data_bytes(&result)
    }

    /// `eth_sendRawTransaction`; returns the transaction hash reported by
    /// the node.
    pub fn send_raw_transaction(&self, raw: &[u8]) -> Result<String, RpcError> {
        let raw_hex = format!("0x{}", hex::encode(raw));
        self.call("eth_sendRawTransaction", json!([raw_hex]))
    }
}

impl ChainClient for HttpRpcClient {
    fn native_balance(&self, address: &str) -> Result<U256, ClientError> {
        self.balance(address).map_err(read_error)
    }

    fn transaction_count(&self, address: &str) -> Result<u64, ClientError> {
        self.nonce(address).map_err(read_error)
    }

    fn call_read_only(&self, contract: &str, calldata: &[u8]) -> Result<Vec<u8>, ClientError> {
        self.call_contract(contract, calldata).map_err(execution_error)
    }

    fn broadcast(&self, signed: &SignedTransaction) -> Result<String, ClientError> {
        self.send_raw_transaction(&signed.raw).map_err(execution_error)
    }
}

/// Read-path mapping: a node error on a plain read means the endpoint and
/// the request disagree, not that a contract reverted.
fn read_error(err: RpcError) -> ClientError {
    match err {
        RpcError::Http(e) => ClientError::Connectivity(e.to_string()),
        RpcError::Url(e) => ClientError::Connectivity(e.to_string()),
        RpcError::Node {
            method,
            code,
            message,
        } => ClientError::Protocol(format!("{method} failed: code {code}: {message}")),
        RpcError::Protocol(msg) => ClientError::Protocol(msg),
    }
}

/// Execution-path mapping: node errors on `eth_call` and
/// `eth_sendRawTransaction` carry the revert reason when there is one.
fn execution_error(err: RpcError) -> ClientError {
    match err {
        RpcError::Node { message, .. } => ClientError::Reverted(message),
        other => read_error(other),
    }
}

fn strip_hex_prefix<'a>(value: &'a str, what: &str) -> Result<&'a str, RpcError> {
    value
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::Protocol(format!("{what} without 0x prefix: {value}")))
}

fn parse_quantity_u256(quantity: &str) -> Result<U256, RpcError> {
    let digits = strip_hex_prefix(quantity, "quantity")?;
    if digits.is_empty() {
        return Err(RpcError::Protocol(format!("empty quantity {quantity}")));
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Protocol(format!("bad quantity {quantity}: {e}")))
}

fn parse_quantity_u64(quantity: &str) -> Result<u64, RpcError> {
    let digits = strip_hex_prefix(quantity, "quantity")?;
    if digits.is_empty() {
        return Err(RpcError::Protocol(format!("empty quantity {quantity}")));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Protocol(format!("bad quantity {quantity}: {e}")))
}

fn parse_data_bytes(data: &str) -> Result<Vec<u8>, RpcError> {
    let digits = strip_hex_prefix(data, "return data")?;
    hex::decode(digits).map_err(|e| RpcError::Protocol(format!("bad return data {data}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const ADDRESS: &str = "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F";

    fn rpc_result(value: &str) -> String {
        json!({ "jsonrpc": "2.0", "id": 1, "result": value }).to_string()
    }

    #[test]
    fn balance_queries_latest_block() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getBalance",
                "params": [ADDRESS, "latest"],
            }));
            then.status(200)
                .header("content-type", "application/json")
                .body(rpc_result("0x1bc16d674ec80000"));
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let balance = rpc.balance(ADDRESS).unwrap();
        mock.assert();
        assert_eq!(balance, U256::from(2_000_000_000_000_000_000u128));
    }

    #[test]
    fn nonce_uses_pending_tag() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getTransactionCount",
                "params": [ADDRESS, "pending"],
            }));
            then.status(200)
                .header("content-type", "application/json")
                .body(rpc_result("0x10"));
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let nonce = rpc.nonce(ADDRESS).unwrap();
        mock.assert();
        assert_eq!(nonce, 16);
    }

    #[test]
    fn chain_id_parses_hex_quantity() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_chainId",
                "params": [],
            }));
            then.status(200)
                .header("content-type", "application/json")
                .body(rpc_result("0x539"));
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        assert_eq!(rpc.chain_id().unwrap(), 1337);
    }

    #[test]
    fn call_contract_hex_encodes_calldata_and_decodes_result() {
        let contract = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_call",
                "params": [{ "to": contract, "data": "0x95d89b41" }, "latest"],
            }));
            then.status(200)
                .header("content-type", "application/json")
                .body(rpc_result(
                    "0x0000000000000000000000000000000000000000000000000000000000000001",
                ));
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let data = rpc.call_contract(contract, &[0x95, 0xd8, 0x9b, 0x41]).unwrap();
        mock.assert();
        assert_eq!(data.len(), 32);
        assert_eq!(data[31], 1);
    }

    #[test]
    fn send_raw_transaction_prefixes_hex_blob() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_sendRawTransaction",
                "params": ["0xf86c0985"],
            }));
            then.status(200)
                .header("content-type", "application/json")
                .body(rpc_result("0xabc123"));
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let hash = rpc.send_raw_transaction(&[0xf8, 0x6c, 0x09, 0x85]).unwrap();
        mock.assert();
        assert_eq!(hash, "0xabc123");
    }

    #[test]
    fn node_error_on_call_surfaces_revert_reason() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "jsonrpc": "2.0",
                        "id": 1,
                        "error": { "code": 3, "message": "execution reverted: transfer amount exceeds balance" }
                    })
                    .to_string(),
                );
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let err = rpc.call_read_only(ADDRESS, &[0x70, 0xa0, 0x82, 0x31]).unwrap_err();
        match err {
            ClientError::Reverted(msg) => assert!(msg.contains("exceeds balance")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn node_error_on_read_is_protocol_not_revert() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    json!({
                        "jsonrpc": "2.0",
                        "id": 1,
                        "error": { "code": -32602, "message": "invalid params" }
                    })
                    .to_string(),
                );
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let err = rpc.native_balance("nonsense").unwrap_err();
        match err {
            ClientError::Protocol(msg) => assert!(msg.contains("invalid params")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn http_error_status_becomes_protocol_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(502).body("bad gateway");
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let err = rpc.balance(ADDRESS).unwrap_err();
        match err {
            RpcError::Protocol(msg) => assert!(msg.contains("HTTP 502")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_a_protocol_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("content-type", "application/json")
                .body(json!({ "jsonrpc": "2.0", "id": 1 }).to_string());
        });

        let rpc = HttpRpcClient::new(&server.base_url()).unwrap();
        let err = rpc.chain_id().unwrap_err();
        match err {
            RpcError::Protocol(msg) => assert!(msg.contains("missing result")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unreachable_endpoint_maps_to_connectivity() {
        // Nothing listens on port 1.
        let rpc = HttpRpcClient::new("http://127.0.0.1:1").unwrap();
        let err = rpc.native_balance(ADDRESS).unwrap_err();
        assert!(matches!(err, ClientError::Connectivity(_)));
    }

    #[test]
    fn invalid_endpoint_url_is_rejected() {
        assert!(HttpRpcClient::new("not a url").is_err());
    }

    #[test]
    fn quantity_parsing_accepts_zero_and_rejects_garbage() {
        assert_eq!(parse_quantity_u256("0x0").unwrap(), U256::ZERO);
        assert_eq!(
            parse_quantity_u256("0x1bc16d674ec80000").unwrap(),
            U256::from(2_000_000_000_000_000_000u128)
        );
        assert!(parse_quantity_u256("12ab").is_err());
        assert!(parse_quantity_u256("0x").is_err());
        assert!(parse_quantity_u64("0xzz").is_err());
    }

    #[test]
    fn empty_return_data_is_valid() {
        assert_eq!(parse_data_bytes("0x").unwrap(), Vec::<u8>::new());
    }
}
