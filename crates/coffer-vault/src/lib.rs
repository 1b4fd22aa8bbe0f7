//! # coffer-vault
//!
//! Password-based decryption of at-rest private-key blobs.
//!
//! A blob is the OpenSSL-style layout `Salted__ || salt(8) || ciphertext`,
//! with the AES-256-CBC key and IV derived from the password via scrypt.
//! Decrypted keys are wrapped in [`DecryptedKey`], which wipes its bytes on
//! drop and never appears in `Debug` output.

pub mod blob;
pub mod encryption;
pub mod error;
pub mod kdf;
pub mod secret;

pub use error::VaultError;
