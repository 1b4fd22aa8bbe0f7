use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::error::ChainError;

/// Derives the EIP-55 checksummed address that belongs to a secp256k1
/// private key given as a hex string (with or without `0x` prefix).
///
/// The derivation takes the Keccak-256 hash of the 64-byte uncompressed
/// public key (without the 0x04 prefix) and uses the last 20 bytes as the
/// address.
pub fn address_of_private_key(private_key_hex: &str) -> Result<String, ChainError> {
    let mut key_bytes = parse_private_key(private_key_hex)?;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;
    key_bytes.zeroize();

    let uncompressed = signing_key.verifying_key().to_encoded_point(false);

    // Keccak-256 of the 64-byte key (skip the 0x04 prefix).
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);

    // Last 20 bytes are the raw address.
    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash[12..]);

    checksum_address(&format!("0x{}", hex::encode(addr_bytes)))
}

/// Validates an Ethereum address string.
///
/// Checks that the address has the correct format (0x + 40 hex characters).
/// If the address contains mixed case, the EIP-55 checksum is verified.
pub fn validate_address(address: &str) -> Result<bool, ChainError> {
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(ChainError::InvalidAddress(
            "address must start with 0x".into(),
        ));
    }

    let hex_part = &address[2..];

    if hex_part.len() != 40 {
        return Err(ChainError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    // All-lowercase and all-uppercase forms carry no checksum to verify.
    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());

    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    // Mixed case: verify EIP-55 checksum.
    let checksummed = checksum_address(&format!("0x{}", hex_part.to_lowercase()))?;
    Ok(checksummed == address)
}

/// Applies EIP-55 mixed-case checksum encoding to an Ethereum address.
///
/// The input should be a lowercase 0x-prefixed address. Returns the
/// checksummed version.
pub fn checksum_address(address: &str) -> Result<String, ChainError> {
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(ChainError::InvalidAddress(
            "address must start with 0x".into(),
        ));
    }

    let hex_part = address[2..].to_lowercase();

    if hex_part.len() != 40 {
        return Err(ChainError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    // EIP-55: hash the lowercase hex address (without 0x).
    let hash = Keccak256::digest(hex_part.as_bytes());
    let hash_hex = hex::encode(hash);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        if c.is_ascii_digit() {
            checksummed.push(c);
        } else {
            // If the corresponding nibble in the hash is >= 8, uppercase it.
            let hash_nibble = u8::from_str_radix(&hash_hex[i..i + 1], 16).unwrap_or(0);
            if hash_nibble >= 8 {
                checksummed.push(c.to_ascii_uppercase());
            } else {
                checksummed.push(c);
            }
        }
    }

    Ok(checksummed)
}

/// Parses a 0x-prefixed hex address string into a 20-byte array.
pub(crate) fn parse_address(address: &str) -> Result<[u8; 20], ChainError> {
    let hex_str = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| ChainError::InvalidAddress("address must start with 0x".into()))?;

    if hex_str.len() != 40 {
        return Err(ChainError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let mut addr = [0u8; 20];
    hex::decode_to_slice(hex_str, &mut addr)
        .map_err(|e| ChainError::InvalidAddress(format!("invalid hex: {e}")))?;
    Ok(addr)
}

/// Parses a private key hex string (optional 0x prefix) into 32 raw bytes.
/// Callers are responsible for zeroizing the returned array.
pub(crate) fn parse_private_key(key_hex: &str) -> Result<[u8; 32], ChainError> {
    let hex_str = key_hex
        .strip_prefix("0x")
        .or_else(|| key_hex.strip_prefix("0X"))
        .unwrap_or(key_hex);

    if hex_str.len() != 64 {
        return Err(ChainError::InvalidPrivateKey(format!(
            "expected 64 hex characters, got {}",
            hex_str.len()
        )));
    }

    let mut bytes = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("invalid hex: {e}")))?;
    Ok(bytes)
}
