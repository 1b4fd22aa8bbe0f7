//! Call data and return-value handling for the three bound ERC-20 methods:
//! `transfer(address,uint256)`, `balanceOf(address)`, `symbol()`.

use alloy_primitives::U256;

use crate::abi::{self, encode_function_call, AbiParam};
use crate::address::parse_address;
use crate::error::ChainError;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `balanceOf(address)`: `0x70a08231`.
const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Function selector for `symbol()`: `0x95d89b41`.
const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// Returns the complete calldata: 4-byte selector + 64 bytes of ABI-encoded
/// recipient and amount.
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, ChainError> {
    let addr = parse_address(to)?;
    let params = [
        AbiParam::Address(addr),
        AbiParam::Uint256(amount.to_be_bytes::<32>()),
    ];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}

/// Encodes an ERC-20 `balanceOf(address)` call.
pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>, ChainError> {
    let addr = parse_address(owner)?;
    let params = [AbiParam::Address(addr)];
    Ok(encode_function_call(BALANCE_OF_SELECTOR, &params))
}

/// Encodes an ERC-20 `symbol()` call (no parameters).
pub fn encode_symbol() -> Vec<u8> {
    encode_function_call(SYMBOL_SELECTOR, &[])
}

/// Decodes the uint256 returned by `balanceOf`.
pub fn decode_balance(data: &[u8]) -> Result<U256, ChainError> {
    Ok(U256::from_be_bytes(abi::decode_uint256(data)?))
}

/// Decodes the string returned by `symbol()`.
pub fn decode_symbol(data: &[u8]) -> Result<String, ChainError> {
    abi::decode_string(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0x000000000000000000000000000000000000dEaD";

    #[test]
    fn encode_transfer_correct_selector_and_length() {
        let data = encode_transfer(OWNER, U256::ZERO).unwrap();

        assert_eq!(&data[..4], &TRANSFER_SELECTOR);
        // 4 (selector) + 32 (address) + 32 (amount) = 68 bytes.
        assert_eq!(data.len(), 68);
    }

    #[test]
    fn encode_transfer_encodes_address() {
        let data = encode_transfer(OWNER, U256::ZERO).unwrap();

        // Address is left-padded to 32 bytes starting at offset 4.
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(data[34], 0xdE);
        assert_eq!(data[35], 0xaD);
    }

    #[test]
    fn encode_transfer_encodes_amount() {
        let data = encode_transfer(OWNER, U256::from(100u64)).unwrap();

        // Amount is at bytes 36..68.
        assert_eq!(data[67], 0x64);
        assert_eq!(&data[36..67], &[0u8; 31]);
    }

    #[test]
    fn encode_transfer_invalid_address() {
        assert!(encode_transfer("not-an-address", U256::ZERO).is_err());
    }

    #[test]
    fn encode_balance_of_correct_selector_and_length() {
        let data = encode_balance_of(OWNER).unwrap();

        assert_eq!(&data[..4], &BALANCE_OF_SELECTOR);
        // 4 (selector) + 32 (address) = 36 bytes.
        assert_eq!(data.len(), 36);
    }

    #[test]
    fn encode_symbol_is_selector_only() {
        let data = encode_symbol();
        assert_eq!(data, vec![0x95, 0xd8, 0x9b, 0x41]);
    }

    #[test]
    fn decode_balance_reads_uint256() {
        let mut data = vec![0u8; 32];
        data[31] = 42;
        assert_eq!(decode_balance(&data).unwrap(), U256::from(42u64));
    }

    #[test]
    fn decode_balance_short_data_errors() {
        assert!(decode_balance(&[0u8; 8]).is_err());
    }

    #[test]
    fn decode_symbol_standard_return() {
        // offset 32, length 3, "W4T" right-padded.
        let mut data = vec![0u8; 32];
        data[31] = 0x20;
        let mut len_word = [0u8; 32];
        len_word[31] = 3;
        data.extend_from_slice(&len_word);
        let mut body = b"W4T".to_vec();
        body.resize(32, 0);
        data.extend_from_slice(&body);

        assert_eq!(decode_symbol(&data).unwrap(), "W4T");
    }

    #[test]
    fn encode_transfer_full_calldata_matches_expected() {
        // Known vector: transfer 1 token (1e18 base units).
        let to = "0xdead000000000000000000000000000000000000";
        let amount = U256::from(1_000_000_000_000_000_000u128);

        let data = encode_transfer(to, amount).unwrap();

        assert_eq!(hex::encode(&data[..4]), "a9059cbb");

        let addr_hex = hex::encode(&data[4..36]);
        assert!(addr_hex.starts_with("000000000000000000000000dead"));

        let amount_hex = hex::encode(&data[36..68]);
        assert!(amount_hex.ends_with("0de0b6b3a7640000"));
    }
}
