//! Password-to-key derivation.
//!
//! scrypt with fixed cost parameters (N = 16384, r = 8, p = 1) stretches
//! the password into 48 bytes: a 32-byte AES-256 key followed by a 16-byte
//! CBC IV. The parameters are part of the blob format and never vary.

use rand::RngCore;
use rand_core::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::blob::SALT_LEN;
use crate::error::VaultError;

/// log2 of the scrypt CPU/memory cost (N = 2^14 = 16384).
pub const SCRYPT_LOG_N: u8 = 14;
/// scrypt block size.
pub const SCRYPT_R: u32 = 8;
/// scrypt parallelism.
pub const SCRYPT_P: u32 = 1;

const DERIVED_LEN: usize = 48;

/// Key and IV derived from a password, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct KeyMaterial {
    pub(crate) key: [u8; 32],
    pub(crate) iv: [u8; 16],
}

/// Derives the AES-256 key and CBC IV for `password` under `salt`.
pub(crate) fn derive_key_iv(password: &[u8], salt: &[u8]) -> Result<KeyMaterial, VaultError> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, DERIVED_LEN)
        .map_err(|e| VaultError::Cipher(e.to_string()))?;

    let mut derived = [0u8; DERIVED_LEN];
    scrypt::scrypt(password, salt, &params, &mut derived)
        .map_err(|e| VaultError::Cipher(e.to_string()))?;

    let mut material = KeyMaterial {
        key: [0u8; 32],
        iv: [0u8; 16],
    };
    material.key.copy_from_slice(&derived[..32]);
    material.iv.copy_from_slice(&derived[32..]);
    derived.zeroize();

    Ok(material)
}

/// Generates a fresh random salt for sealing a new blob.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
