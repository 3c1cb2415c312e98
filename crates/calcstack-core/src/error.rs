//! Error types for calcstack core.

use thiserror::Error;

/// Core errors raised by signing, canonicalization and diagnostics encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("missing signature for signer {0}")]
    MissingSignature(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("non-finite float {0} cannot be canonically encoded")]
    NonFiniteFloat(f64),

    #[error("diagnostic message contains the delimiter {delimiter:?}: {message}")]
    DelimiterInDiagnostic { delimiter: char, message: String },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
