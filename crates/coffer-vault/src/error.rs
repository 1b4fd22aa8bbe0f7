use thiserror::Error;

/// Key-vault operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    /// The blob does not start with the expected magic header (or is too
    /// short to contain header and salt). Raised before any key derivation.
    #[error("malformed key blob: missing or invalid magic header")]
    MalformedHeader,

    /// PKCS#7 padding validation failed after decryption. A wrong password
    /// and corrupt ciphertext are indistinguishable at this layer: both
    /// produce garbage plaintext, and garbage almost never carries valid
    /// padding. The converse also holds: a wrong key can, rarely, yield
    /// plaintext with valid padding, so absence of this error does not
    /// prove the password was right.
    #[error("wrong password or corrupt ciphertext")]
    BadPasswordOrCiphertext,

    /// A cipher-layer failure (KDF parameters, output sizing). Not
    /// reachable with the fixed parameters this crate compiles in.
    #[error("cipher failure: {0}")]
    Cipher(String),
}
