//! JWT error types

use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Symbolic algorithm name is not one of the supported variants
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Input is not valid base64url (or not valid UTF-8 once decoded)
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Token string does not have the expected segment structure
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Key bytes cannot be used with the chosen primitive
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Operation invoked with an algorithm family it cannot handle
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The underlying cryptographic primitive reported a failure
    #[error("Cryptographic operation failed: {0}")]
    CryptoFailure(String),

    /// The injected JSON collaborator failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JwtError {
    /// Create an unknown algorithm error
    #[inline]
    #[must_use]
    pub fn unknown_algorithm(name: &str) -> Self {
        JwtError::UnknownAlgorithm(name.to_string())
    }

    /// Create a malformed encoding error
    #[inline]
    #[must_use]
    pub fn malformed_encoding(msg: &str) -> Self {
        JwtError::MalformedEncoding(msg.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create a crypto failure error
    #[inline]
    #[must_use]
    pub fn crypto_failure(msg: &str) -> Self {
        JwtError::CryptoFailure(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }
}
