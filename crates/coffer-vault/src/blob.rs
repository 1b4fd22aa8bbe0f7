//! At-rest layout of an encrypted private key.
//!
//! The on-disk format is the OpenSSL `enc` convention:
//!
//! ```text
//! "Salted__" || salt (8 bytes) || AES-256-CBC ciphertext
//! ```
//!
//! The magic string lets a reader distinguish a structurally broken blob
//! from one that merely fails to decrypt.

use crate::error::VaultError;

/// Leading magic of every encrypted key blob.
pub const MAGIC: [u8; 8] = *b"Salted__";

/// Length of the KDF salt that follows the magic.
pub const SALT_LEN: usize = 8;

/// A raw encrypted key blob, validated lazily on access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedKeyBlob(Vec<u8>);

impl EncryptedKeyBlob {
    /// Wraps raw bytes without validating them. Structural checks happen
    /// when the blob is decrypted.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw blob bytes, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Splits the blob into its salt and ciphertext, verifying the magic
    /// header first. Fails with [`VaultError::MalformedHeader`] if the blob
    /// is too short or the magic does not match.
    pub(crate) fn salt_and_ciphertext(&self) -> Result<(&[u8], &[u8]), VaultError> {
        if self.0.len() < MAGIC.len() + SALT_LEN {
            return Err(VaultError::MalformedHeader);
        }
        let (header, rest) = self.0.split_at(MAGIC.len());
        if header != MAGIC {
            return Err(VaultError::MalformedHeader);
        }
        let (salt, ciphertext) = rest.split_at(SALT_LEN);
        Ok((salt, ciphertext))
    }
}

impl From<Vec<u8>> for EncryptedKeyBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}
