//! Minimal ABI encoding and decoding for EVM function calls.
//!
//! Provides just enough of the ABI to build ERC-20 call data and decode the
//! two return shapes this crate consumes (a single `uint256`, a single
//! `string`) without pulling in a full ABI parser.

use crate::error::ChainError;

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer as a big-endian 32-byte array.
    Uint256([u8; 32]),
}

/// Encodes a function call with the given 4-byte selector and ABI parameters.
///
/// The output is `selector || encode(params[0]) || encode(params[1]) || ...`
/// where each parameter is encoded as a 32-byte ABI word.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * 32);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

/// Encodes a single [`AbiParam`] as a 32-byte ABI word.
fn encode_param(param: &AbiParam) -> [u8; 32] {
    match param {
        AbiParam::Address(addr) => {
            // Left-pad: 12 zero bytes + 20 address bytes.
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr);
            word
        }
        AbiParam::Uint256(value) => {
            // Already a 32-byte big-endian integer.
            *value
        }
    }
}

/// Decodes a single uint256 return value from ABI-encoded data.
pub fn decode_uint256(data: &[u8]) -> Result<[u8; 32], ChainError> {
    if data.len() < 32 {
        return Err(ChainError::DecodingError(format!(
            "expected at least 32 bytes for uint256, got {}",
            data.len()
        )));
    }

    let mut result = [0u8; 32];
    result.copy_from_slice(&data[..32]);
    Ok(result)
}

/// Decodes a single dynamic `string` return value from ABI-encoded data.
///
/// The layout is a 32-byte offset word, then at that offset a 32-byte
/// length word followed by the UTF-8 bytes (right-padded to a word).
pub fn decode_string(data: &[u8]) -> Result<String, ChainError> {
    let offset = decode_usize_word(data, 0)?;
    let len = decode_usize_word(data, offset)?;

    let start = offset + 32;
    let end = start
        .checked_add(len)
        .ok_or_else(|| ChainError::DecodingError("string length overflows".into()))?;
    if end > data.len() {
        return Err(ChainError::DecodingError(format!(
            "string body of {len} bytes exceeds the {} bytes of return data",
            data.len()
        )));
    }

    String::from_utf8(data[start..end].to_vec())
        .map_err(|e| ChainError::DecodingError(format!("string is not valid UTF-8: {e}")))
}

/// Reads the 32-byte big-endian word at `at` as a usize.
fn decode_usize_word(data: &[u8], at: usize) -> Result<usize, ChainError> {
    let end = at
        .checked_add(32)
        .ok_or_else(|| ChainError::DecodingError("word offset overflows".into()))?;
    let word = data.get(at..end).ok_or_else(|| {
        ChainError::DecodingError(format!(
            "expected a 32-byte word at offset {at} in {} bytes of return data",
            data.len()
        ))
    })?;

    // High bytes past usize range must be zero.
    if word[..24].iter().any(|&b| b != 0) {
        return Err(ChainError::DecodingError(
            "word value does not fit in usize".into(),
        ));
    }

    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(tail))
        .map_err(|_| ChainError::DecodingError("word value does not fit in usize".into()))
}
