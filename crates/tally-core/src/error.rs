//! Error types for Tally Core.

use thiserror::Error;

use crate::types::Address;

/// Errors raised by the cryptographic and encoding primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result of the stateless signature check on a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("signature does not recover to any key")]
    Unrecoverable,

    #[error("signer mismatch: transaction claims {expected}, signature recovers to {recovered}")]
    SignatureMismatch { expected: Address, recovered: Address },
}

impl From<CoreError> for ValidationError {
    fn from(_: CoreError) -> Self {
        ValidationError::Unrecoverable
    }
}
