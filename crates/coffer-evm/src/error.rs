use thiserror::Error;

/// EVM chain operation errors.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}
