use coffer_evm::client::ClientError;
use coffer_evm::ChainError;
use coffer_vault::VaultError;
use thiserror::Error;

/// The closed set of failures the orchestrator matches on.
///
/// Everything that can go wrong while processing one wallet or one token
/// collapses into one of these kinds, so callers branch on the kind rather
/// than on message text.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("decryption failed: {0}")]
    Decryption(#[from] VaultError),

    #[error("chain endpoint failed: {0}")]
    Connectivity(String),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("invalid input: {0}")]
    InputValidation(String),

    #[error("decrypted key does not match the wallet address: derived {derived}, expected {expected}")]
    KeyMismatch { expected: String, derived: String },
}

impl From<ClientError> for CoreError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Connectivity(msg) => CoreError::Connectivity(msg),
            // A response the adapter could not interpret is an endpoint
            // failure at this granularity.
            ClientError::Protocol(msg) => CoreError::Connectivity(msg),
            ClientError::Reverted(msg) => CoreError::Contract(msg),
        }
    }
}

impl From<ChainError> for CoreError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::InvalidAddress(_) | ChainError::InvalidAmount(_) => {
                CoreError::InputValidation(e.to_string())
            }
            // Undecodable return data from a contract call.
            ChainError::DecodingError(_) => CoreError::Contract(e.to_string()),
            // A key the signer rejects is wrong-password garbage that
            // happened to carry valid padding.
            ChainError::InvalidPrivateKey(_) | ChainError::SigningError(_) => {
                CoreError::Decryption(VaultError::BadPasswordOrCiphertext)
            }
        }
    }
}
