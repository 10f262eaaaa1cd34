//! JWT error types

use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Token does not have the `header.payload.signature` shape
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    /// Text is not valid base64url
    #[error("Decoding error: {0}")]
    Decoding(String),
    /// Key source bytes carry no PEM armor block
    #[error("No PEM object found")]
    NoPemObjectFound,
    /// A keyed algorithm was requested but no key source was supplied
    #[error("No key supplied for the {0} algorithm")]
    MissingKey(String),
    /// DER bytes do not match the expected ASN.1 key structure
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),
    /// Decoded key belongs to a different algorithm family or curve
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),
    /// Identifier is `none` where a cryptographic operation was requested, or unknown
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Token header declares a different algorithm than the verifier uses
    #[error("Expected algorithm {expected}, but got {actual}")]
    AlgorithmMismatch {
        /// Algorithm the verifier was configured with
        expected: String,
        /// Algorithm declared by the token header
        actual: String,
    },
    /// Underlying primitive rejected the key or input while signing
    #[error("Signature generation failed: {0}")]
    SignatureGeneration(String),
    /// Signature does not match the signing input
    #[error("The token's signature resulted invalid when verified using the {0} algorithm")]
    SignatureVerification(String),
    /// Header JSON is not an object or lacks a usable `alg`
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Fieldless classification of [`JwtError`], for mapping onto exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Token text could not be read as a JWT
    Token,
    /// Key material could not be loaded
    Key,
    /// Algorithm could not be resolved or does not match
    Algorithm,
    /// Signing failed
    Signing,
    /// Signature did not verify
    Verification,
    /// JSON handling failed
    Json,
}

impl JwtError {
    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create a decoding error
    #[inline]
    #[must_use]
    pub fn decoding(msg: &str) -> Self {
        JwtError::Decoding(msg.to_string())
    }

    /// Create a missing key error
    #[inline]
    #[must_use]
    pub fn missing_key(alg: &str) -> Self {
        JwtError::MissingKey(alg.to_string())
    }

    /// Create an invalid key encoding error
    #[inline]
    #[must_use]
    pub fn invalid_key_encoding(msg: &str) -> Self {
        JwtError::InvalidKeyEncoding(msg.to_string())
    }

    /// Create an unsupported key algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_key_algorithm(msg: &str) -> Self {
        JwtError::UnsupportedKeyAlgorithm(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create an algorithm mismatch error
    #[inline]
    #[must_use]
    pub fn algorithm_mismatch(expected: &str, actual: &str) -> Self {
        JwtError::AlgorithmMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a signature generation error
    #[inline]
    #[must_use]
    pub fn signature_generation(msg: &str) -> Self {
        JwtError::SignatureGeneration(msg.to_string())
    }

    /// Create a signature verification error
    #[inline]
    #[must_use]
    pub fn signature_verification(alg: &str) -> Self {
        JwtError::SignatureVerification(alg.to_string())
    }

    /// Create an invalid header error
    #[inline]
    #[must_use]
    pub fn invalid_header(msg: &str) -> Self {
        JwtError::InvalidHeader(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }

    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            JwtError::MalformedToken(_) | JwtError::Decoding(_) => ErrorKind::Token,
            JwtError::NoPemObjectFound
            | JwtError::MissingKey(_)
            | JwtError::InvalidKeyEncoding(_)
            | JwtError::UnsupportedKeyAlgorithm(_) => ErrorKind::Key,
            JwtError::UnsupportedAlgorithm(_) | JwtError::AlgorithmMismatch { .. } => {
                ErrorKind::Algorithm
            }
            JwtError::SignatureGeneration(_) => ErrorKind::Signing,
            JwtError::SignatureVerification(_) => ErrorKind::Verification,
            JwtError::InvalidHeader(_) | JwtError::Serialization(_) => ErrorKind::Json,
        }
    }

    /// Whether a verifier should report this as `INVALID` rather than as a read failure
    ///
    /// Algorithm mismatches count as verification failures: the token was readable,
    /// it just was not produced with the algorithm the caller trusts.
    #[must_use]
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            JwtError::SignatureVerification(_) | JwtError::AlgorithmMismatch { .. }
        )
    }
}

impl From<base64::DecodeError> for JwtError {
    fn from(err: base64::DecodeError) -> Self {
        JwtError::Decoding(err.to_string())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Serialization(err.to_string())
    }
}
