//! Wallet configuration records.
//!
//! The wallet file is JSON with camelCase keys:
//!
//! ```json
//! {
//!   "wallets": [
//!     {
//!       "address": "0x…",
//!       "encryptedPrivateKey": "base64…",
//!       "tokens": [{ "contractAddress": "0x…", "symbol": "PTK" }]
//!     }
//!   ]
//! }
//! ```
//!
//! Records are parsed into typed values and validated up front: every
//! address must pass EIP-55 validation and every key blob must decode from
//! base64. A malformed record fails the whole load with an error naming the
//! offending wallet, before any crypto or chain call happens.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use coffer_evm::address;
use coffer_vault::blob::EncryptedKeyBlob;

use crate::error::CoreError;

/// One wallet to process: validated, immutable for the run.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// EIP-55 checksummed address (normalized at load).
    pub address: String,
    pub encrypted_key: EncryptedKeyBlob,
    pub tokens: Vec<TokenRef>,
}

/// A token contract bound to a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    /// EIP-55 checksummed contract address (normalized at load).
    pub contract: String,
    /// Display hint from the config; the on-chain `symbol()` wins when the
    /// query succeeds.
    pub symbol_hint: Option<String>,
}

#[derive(Deserialize)]
struct RawFile {
    wallets: Vec<RawWallet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWallet {
    address: String,
    encrypted_private_key: String,
    #[serde(default)]
    tokens: Vec<RawToken>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToken {
    contract_address: String,
    symbol: Option<String>,
}

/// Parses and validates a wallet file read from disk.
pub fn parse_wallets(json: &str) -> Result<Vec<Wallet>, CoreError> {
    let file: RawFile = serde_json::from_str(json)
        .map_err(|e| CoreError::InputValidation(format!("wallet file: {e}")))?;

    file.wallets.into_iter().map(validate_wallet).collect()
}

fn validate_wallet(raw: RawWallet) -> Result<Wallet, CoreError> {
    let address = checksummed(&raw.address)
        .map_err(|e| CoreError::InputValidation(format!("wallet {}: {e}", raw.address)))?;

    let blob = BASE64.decode(&raw.encrypted_private_key).map_err(|e| {
        CoreError::InputValidation(format!("wallet {address}: encrypted key is not base64: {e}"))
    })?;

    let tokens = raw
        .tokens
        .into_iter()
        .map(|t| {
            let contract = checksummed(&t.contract_address).map_err(|e| {
                CoreError::InputValidation(format!(
                    "wallet {address}: token {}: {e}",
                    t.contract_address
                ))
            })?;
            Ok(TokenRef {
                contract,
                symbol_hint: t.symbol,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(Wallet {
        address,
        encrypted_key: EncryptedKeyBlob::from_bytes(blob),
        tokens,
    })
}

/// Validates an address and normalizes it to its checksummed form.
fn checksummed(raw: &str) -> Result<String, String> {
    match address::validate_address(raw) {
        Ok(true) => address::checksum_address(raw).map_err(|e| e.to_string()),
        Ok(false) => Err("bad EIP-55 checksum".into()),
        Err(e) => Err(e.to_string()),
    }
}
