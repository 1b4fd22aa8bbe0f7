//! # coffer-evm
//!
//! EVM chain support for the coffer transfer tool:
//! - Address derivation from secp256k1 private keys (with EIP-55 checksums)
//! - Legacy EIP-155 transaction building and signing
//! - ERC-20 call encoding and return decoding (transfer, balanceOf, symbol)
//! - Exact decimal scaling between human amounts and base units
//! - The [`client::ChainClient`] capability trait that adapters implement

pub mod abi;
pub mod address;
pub mod client;
pub mod erc20;
pub mod error;
pub mod transaction;
pub mod units;

pub use error::ChainError;
