use alloy_primitives::U256;
use thiserror::Error;

use crate::error::ChainError;
use crate::transaction::{self, SignedTransaction, Transaction};

/// Chain adapter failures as seen by callers of [`ChainClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint could not be reached or the request failed in transit.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// The chain executed the call and reported a revert reason.
    #[error("contract call reverted: {0}")]
    Reverted(String),

    /// The endpoint answered with something the adapter could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Capability interface to an EVM chain.
///
/// The four remote operations are everything the transfer pipeline needs
/// from a node; any conforming adapter (HTTP JSON-RPC, WebSocket, an
/// in-memory mock) satisfies it. Signing never leaves the process, so it
/// ships as a provided method backed by the local signer.
pub trait ChainClient {
    /// Native-coin balance of `address` in wei.
    fn native_balance(&self, address: &str) -> Result<U256, ClientError>;

    /// Transaction count of `address`, which is its next nonce.
    fn transaction_count(&self, address: &str) -> Result<u64, ClientError>;

    /// Executes a read-only contract call and returns the raw return data.
    fn call_read_only(&self, contract: &str, calldata: &[u8]) -> Result<Vec<u8>, ClientError>;

    /// Broadcasts a signed raw transaction and returns the transaction
    /// hash reported by the chain.
    fn broadcast(&self, signed: &SignedTransaction) -> Result<String, ClientError>;

    /// Signs `tx` with a hex-encoded private key. Local operation, no
    /// chain round trip.
    fn sign(
        &self,
        tx: &Transaction,
        private_key_hex: &str,
    ) -> Result<SignedTransaction, ChainError> {
        transaction::sign(tx, private_key_hex)
    }
}
