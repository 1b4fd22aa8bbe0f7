use alloy_primitives::U256;
use alloy_rlp::{Bytes, Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::{parse_address, parse_private_key};
use crate::erc20;
use crate::error::ChainError;

/// An unsigned legacy (EIP-155 replay-protected) EVM transaction.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Recipient address as a 0x-prefixed hex string.
    pub to: String,
    /// Transfer value in wei.
    pub value: u128,
    /// Calldata (empty for plain value transfers).
    pub data: Vec<u8>,
}

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw: Vec<u8>,
    /// Transaction hash as a 0x-prefixed hex string.
    pub hash: String,
}

/// Builds an unsigned ERC-20 token transfer transaction.
///
/// The transaction is addressed to the token contract with zero native
/// value; the recipient and amount travel in the
/// `transfer(address,uint256)` calldata.
pub fn build_erc20_transfer(
    chain_id: u64,
    nonce: u64,
    token_contract: &str,
    to: &str,
    amount: U256,
    gas_price: u128,
    gas_limit: u64,
) -> Result<Transaction, ChainError> {
    let _ = parse_address(token_contract)?;
    let calldata = erc20::encode_transfer(to, amount)?;

    Ok(Transaction {
        chain_id,
        nonce,
        gas_price,
        gas_limit,
        to: token_contract.to_string(),
        value: 0,
        data: calldata,
    })
}

/// Signs a legacy transaction with the given secp256k1 private key.
///
/// The signing process:
/// 1. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0]`.
/// 2. Keccak-256 hash the payload and sign the hash with k256.
/// 3. Fold the chain id into the recovery value: `v = chain_id * 2 + 35 + parity`.
/// 4. RLP-encode the fields again with `(v, r, s)` in place of the
///    `(chain_id, 0, 0)` placeholders.
/// 5. Return the raw bytes and their Keccak-256 hash.
pub fn sign(tx: &Transaction, private_key_hex: &str) -> Result<SignedTransaction, ChainError> {
    let signing_payload = encode_unsigned_tx(tx)?;
    let msg_hash = Keccak256::digest(&signing_payload);

    // Create the signing key (zeroized after use).
    let mut key_bytes = parse_private_key(private_key_hex)?;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;
    key_bytes.zeroize();

    // Sign the raw 32-byte hash via PrehashSigner.
    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(msg_hash.as_slice())
        .map_err(|e| ChainError::SigningError(e.to_string()))?;

    let v = tx.chain_id as u128 * 2 + 35 + recovery_id.is_y_odd() as u128;

    let r_generic = signature.r().to_bytes();
    let s_generic = signature.s().to_bytes();
    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&r_generic);
    s_bytes.copy_from_slice(&s_generic);

    let signed_fields = SignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: parse_to_field(&tx.to)?,
        value: tx.value,
        data: tx.data.clone().into(),
        v,
        r: r_bytes.into(),
        s: s_bytes.into(),
    };

    let mut raw = Vec::new();
    signed_fields.encode(&mut raw);

    // Transaction hash is the Keccak-256 of the signed raw bytes.
    let tx_hash = Keccak256::digest(&raw);
    let tx_hash_hex = format!("0x{}", hex::encode(tx_hash));

    Ok(SignedTransaction {
        raw,
        hash: tx_hash_hex,
    })
}

/// Encodes the EIP-155 signing payload:
/// `rlp([nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0])`.
pub fn encode_unsigned_tx(tx: &Transaction) -> Result<Vec<u8>, ChainError> {
    let unsigned_fields = UnsignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: parse_to_field(&tx.to)?,
        value: tx.value,
        data: tx.data.clone().into(),
        chain_id: tx.chain_id,
        zero_r: 0,
        zero_s: 0,
    };

    let mut payload = Vec::new();
    unsigned_fields.encode(&mut payload);
    Ok(payload)
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

/// Unsigned legacy transaction fields for RLP encoding. The trailing
/// `(chain_id, 0, 0)` triple is the EIP-155 replay-protection placeholder.
#[derive(RlpEncodable)]
struct UnsignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    /// `Bytes`, not `Vec<u8>`: the alloy-rlp blanket `Vec<T>` impl would
    /// encode the calldata as a list of integers instead of a byte string.
    data: Bytes,
    chain_id: u64,
    zero_r: u8,
    zero_s: u8,
}

/// Signed legacy transaction fields for RLP encoding.
#[derive(RlpEncodable)]
struct SignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    /// See [`UnsignedTxFields::data`] for why this is `Bytes`.
    data: Bytes,
    v: u128,
    r: RlpU256,
    s: RlpU256,
}

/// Wrapper for a 20-byte Ethereum address that implements `Encodable`.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        // Encode as a 20-byte string.
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Wrapper for a 256-bit integer (32 bytes) that encodes as minimal
/// big-endian bytes with leading zeros stripped (standard RLP integer
/// encoding).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl From<[u8; 32]> for RlpU256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        // Strip leading zeros for minimal encoding.
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        let trimmed = &self.0[start..];
        trimmed.encode(out);
    }

    fn length(&self) -> usize {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        let trimmed = &self.0[start..];
        trimmed.length()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parses a 0x-prefixed hex address string into the RLP wrapper.
fn parse_to_field(address: &str) -> Result<RlpAddress, ChainError> {
    Ok(RlpAddress(parse_address(address)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The worked EIP-155 example: private key 0x46 repeated 32 times.
    const EIP155_KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";

    const TEST_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";

    fn eip155_example_tx() -> Transaction {
        Transaction {
            chain_id: 1,
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: "0x3535353535353535353535353535353535353535".into(),
            value: 1_000_000_000_000_000_000,
            data: Vec::new(),
        }
    }

    #[test]
    fn eip155_signing_payload_matches_worked_example() {
        let payload = encode_unsigned_tx(&eip155_example_tx()).unwrap();
        assert_eq!(
            hex::encode(&payload),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );

        let hash = Keccak256::digest(&payload);
        assert_eq!(
            hex::encode(hash),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn eip155_signed_tx_matches_worked_example() {
        let signed = sign(&eip155_example_tx(), EIP155_KEY).unwrap();
        assert_eq!(
            hex::encode(&signed.raw),
            "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert!(signed.hash.starts_with("0x"));
        assert_eq!(signed.hash.len(), 66);
    }

    #[test]
    fn sign_is_deterministic() {
        let tx = eip155_example_tx();
        let a = sign(&tx, EIP155_KEY).unwrap();
        let b = sign(&tx, EIP155_KEY).unwrap();
        assert_eq!(a.raw, b.raw);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn different_nonces_sign_differently() {
        let mut tx2 = eip155_example_tx();
        tx2.nonce += 1;

        let a = sign(&eip155_example_tx(), EIP155_KEY).unwrap();
        let b = sign(&tx2, EIP155_KEY).unwrap();
        assert_ne!(a.raw, b.raw);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn different_chains_sign_differently() {
        let mut tx2 = eip155_example_tx();
        tx2.chain_id = 1337;

        let a = sign(&eip155_example_tx(), EIP155_KEY).unwrap();
        let b = sign(&tx2, EIP155_KEY).unwrap();
        assert_ne!(a.raw, b.raw);
    }

    #[test]
    fn sign_rejects_invalid_private_key() {
        // All zeros is not a valid secp256k1 scalar.
        let zeros = "0".repeat(64);
        assert!(sign(&eip155_example_tx(), &zeros).is_err());
        assert!(sign(&eip155_example_tx(), "0xdeadbeef").is_err());
    }

    #[test]
    fn build_erc20_transfer_creates_valid_tx() {
        let token = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
        let tx = build_erc20_transfer(
            1337,
            5,
            token,
            TEST_ADDRESS,
            U256::from(100u64),
            10_000_000_000,
            60_000,
        )
        .unwrap();

        assert_eq!(tx.chain_id, 1337);
        assert_eq!(tx.nonce, 5);
        assert_eq!(tx.value, 0);
        assert_eq!(tx.gas_limit, 60_000);
        assert_eq!(tx.to, token);
        // Calldata: 4-byte selector + 32-byte address + 32-byte amount.
        assert_eq!(tx.data.len(), 68);
        assert_eq!(&tx.data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn build_erc20_transfer_invalid_contract() {
        let result = build_erc20_transfer(
            1,
            0,
            "not-an-address",
            TEST_ADDRESS,
            U256::ZERO,
            0,
            60_000,
        );
        assert!(result.is_err());
    }

    #[test]
    fn build_erc20_transfer_invalid_recipient() {
        let result = build_erc20_transfer(
            1,
            0,
            TEST_ADDRESS,
            "bad",
            U256::ZERO,
            0,
            60_000,
        );
        assert!(result.is_err());
    }

    #[test]
    fn signed_erc20_transfer_round_trips_through_signer() {
        let tx = build_erc20_transfer(
            1337,
            0,
            TEST_ADDRESS,
            "0x3535353535353535353535353535353535353535",
            U256::from(1u64),
            10_000_000_000,
            60_000,
        )
        .unwrap();

        let signed = sign(&tx, EIP155_KEY).unwrap();
        // v for chain 1337 is 2709 or 2710, always two RLP bytes.
        assert!(signed.raw.len() > tx.data.len());
        assert!(signed.hash.starts_with("0x"));
    }

    #[test]
    fn rlp_u256_zero_encodes_as_empty() {
        let zero = RlpU256([0u8; 32]);
        let mut buf = Vec::new();
        zero.encode(&mut buf);

        // RLP encoding of empty bytes is 0x80.
        assert_eq!(buf, vec![0x80]);
    }

    #[test]
    fn rlp_u256_small_value_encodes_minimally() {
        let mut value = [0u8; 32];
        value[31] = 42;

        let rlp_val = RlpU256(value);
        let mut buf = Vec::new();
        rlp_val.encode(&mut buf);

        // 42 < 0x80, so RLP encodes it as a single byte.
        assert_eq!(buf, vec![42]);
    }

    #[test]
    fn rlp_address_encodes_20_bytes() {
        let addr = RlpAddress([0xdeu8; 20]);
        let mut buf = Vec::new();
        addr.encode(&mut buf);

        // RLP for a 20-byte string: 0x80 + 20 = 0x94 prefix, then the bytes.
        assert_eq!(buf.len(), 21);
        assert_eq!(buf[0], 0x94);
        assert_eq!(&buf[1..], &[0xde; 20]);
    }
}
