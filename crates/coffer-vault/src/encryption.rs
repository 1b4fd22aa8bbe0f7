//! AES-256-CBC decryption and sealing of key blobs.
//!
//! `decrypt` is the hot path: header check, key derivation, block
//! decryption, PKCS#7 unpadding. `seal` is its inverse and exists for
//! provisioning new blobs and for building test fixtures.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::blob::{EncryptedKeyBlob, MAGIC, SALT_LEN};
use crate::error::VaultError;
use crate::kdf;
use crate::secret::DecryptedKey;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK: usize = 16;

/// Decrypts `blob` with `password`.
///
/// The magic header is verified before the expensive key derivation runs.
/// Padding validation catches a wrong password or corrupt ciphertext with
/// overwhelming probability, but a rare false pass is possible; callers
/// that know what the plaintext should look like ought to check it.
pub fn decrypt(
    blob: &EncryptedKeyBlob,
    password: &SecretString,
) -> Result<DecryptedKey, VaultError> {
    let (salt, ciphertext) = blob.salt_and_ciphertext()?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK != 0 {
        // CBC ciphertext is always a positive number of whole blocks.
        return Err(VaultError::BadPasswordOrCiphertext);
    }

    let keys = kdf::derive_key_iv(password.expose_secret().as_bytes(), salt)?;

    let mut buf = ciphertext.to_vec();
    let unpadded_len = Aes256CbcDec::new((&keys.key).into(), (&keys.iv).into())
        .decrypt_padded_mut::<Pkcs7>(&mut buf)
        .map(|plaintext| plaintext.len());

    match unpadded_len {
        Ok(len) => {
            buf.truncate(len);
            Ok(DecryptedKey::new(buf))
        }
        Err(_) => {
            buf.zeroize();
            Err(VaultError::BadPasswordOrCiphertext)
        }
    }
}

/// Encrypts `plaintext` under `password` with a fresh random salt.
pub fn seal(plaintext: &[u8], password: &SecretString) -> Result<EncryptedKeyBlob, VaultError> {
    let salt = kdf::generate_salt();
    seal_with_salt(plaintext, password, &salt)
}

pub(crate) fn seal_with_salt(
    plaintext: &[u8],
    password: &SecretString,
    salt: &[u8; SALT_LEN],
) -> Result<EncryptedKeyBlob, VaultError> {
    let keys = kdf::derive_key_iv(password.expose_secret().as_bytes(), salt)?;

    // PKCS#7 always pads, so the ciphertext is one block longer than the
    // last full plaintext block.
    let padded_len = (plaintext.len() / BLOCK + 1) * BLOCK;
    let mut buf = vec![0u8; padded_len];
    buf[..plaintext.len()].copy_from_slice(plaintext);

    Aes256CbcEnc::new((&keys.key).into(), (&keys.iv).into())
        .encrypt_padded_mut::<Pkcs7>(&mut buf, plaintext.len())
        .map_err(|e| VaultError::Cipher(e.to_string()))?;

    let mut out = Vec::with_capacity(MAGIC.len() + SALT_LEN + buf.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(salt);
    out.extend_from_slice(&buf);
    Ok(EncryptedKeyBlob::from_bytes(out))
}
