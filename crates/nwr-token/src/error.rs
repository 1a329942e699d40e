//! Error types for session tokens.

use thiserror::Error;

/// Errors that can occur while issuing or verifying session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// Failed to create token.
    #[error("failed to create token: {0}")]
    TokenCreationFailed(String),

    /// Failed to parse token (bad encoding or bad signature).
    #[error("failed to parse token: {0}")]
    TokenParseFailed(String),

    /// Token checks failed, including expiry.
    #[error("token verification failed: {0}")]
    VerificationFailed(String),

    /// Token is missing required claim.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: String },

    /// A claim is present but holds an unusable value.
    #[error("token claim {claim} is invalid: {reason}")]
    InvalidClaim { claim: String, reason: String },

    /// Failed to serialize token.
    #[error("token serialization error: {0}")]
    SerializationError(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
