//! Binding of a token contract address to the three ERC-20 operations the
//! pipeline uses: `symbol()`, `balanceOf(owner)`, and
//! `transfer(to, amount)`, with decimal-aware value conversion.

use alloy_primitives::U256;

use coffer_evm::client::ChainClient;
use coffer_evm::transaction::{self, Transaction};
use coffer_evm::{address, erc20, units};

use crate::error::CoreError;

/// Gas and chain parameters fixed for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct TxParams {
    pub chain_id: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub gas_limit: u64,
}

/// A fully resolved transfer, ready for signing.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Checksummed recipient address.
    pub recipient: String,
    /// Human-scale decimal amount as confirmed at the prompt.
    pub amount: String,
    /// `amount` scaled to integer base units.
    pub value: U256,
    /// Signable legacy transaction addressed to the token contract; carries
    /// the gas parameters, chain id, and the effective nonce.
    pub tx: Transaction,
}

/// Queries `symbol()` and `balanceOf(owner)` for one token.
///
/// Returns the on-chain symbol, the raw base-unit balance, and the decimal
/// scale to display it with. The scale is the fixed
/// [`units::DEFAULT_TOKEN_DECIMALS`]; the contract's `decimals()` method is
/// deliberately not queried, so a token with a different scale displays and
/// transfers at the wrong magnitude.
pub fn symbol_and_balance(
    client: &dyn ChainClient,
    token: &str,
    owner: &str,
) -> Result<(String, U256, u8), CoreError> {
    let data = client.call_read_only(token, &erc20::encode_symbol())?;
    let symbol = erc20::decode_symbol(&data)?;

    let data = client.call_read_only(token, &erc20::encode_balance_of(owner)?)?;
    let balance = erc20::decode_balance(&data)?;

    Ok((symbol, balance, units::DEFAULT_TOKEN_DECIMALS))
}

/// Builds a transfer of `amount` tokens from `from` to `to`.
///
/// Recipient and amount are rejected before any chain call. The amount is
/// scaled by `decimals` with truncation: precision beyond the token's
/// smallest unit is dropped, never rounded.
///
/// The nonce is the sender's transaction count queried now, bumped to
/// `nonce_floor` if that is higher. The floor covers transfers already
/// broadcast in this run that the node may not count yet.
pub fn build_transfer(
    client: &dyn ChainClient,
    token: &str,
    from: &str,
    to: &str,
    amount: &str,
    decimals: u8,
    params: TxParams,
    nonce_floor: Option<u64>,
) -> Result<TransferRequest, CoreError> {
    let recipient = match address::validate_address(to) {
        Ok(true) => address::checksum_address(to)?,
        Ok(false) => {
            return Err(CoreError::InputValidation(format!(
                "recipient {to}: bad EIP-55 checksum"
            )))
        }
        Err(e) => return Err(CoreError::InputValidation(format!("recipient: {e}"))),
    };
    let value = units::parse_units(amount, decimals)?;

    let chain_nonce = client.transaction_count(from)?;
    let nonce = nonce_floor.map_or(chain_nonce, |floor| chain_nonce.max(floor));

    let tx = transaction::build_erc20_transfer(
        params.chain_id,
        nonce,
        token,
        &recipient,
        value,
        params.gas_price,
        params.gas_limit,
    )?;

    Ok(TransferRequest {
        recipient,
        amount: amount.to_string(),
        value,
        tx,
    })
}
