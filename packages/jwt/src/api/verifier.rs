//! Signature verification
//!
//! Every path checks the header's declared `alg` against the algorithm the caller
//! trusts before any key is loaded or any signature math runs. Unsigned tokens are
//! rejected unless [`VerifyOptions::allow_unsigned`] is set.

use crate::alg::Alg;
use crate::api::decoder::decode;
use crate::error::{JwtError, JwtResult};
use crate::registry::{self, VerifyingAlgorithm};
use crate::traits::JwsVerifier;
use crate::types::{DecodedToken, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Verification policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Accept `alg: none` tokens with an empty signature when `none` is expected
    pub allow_unsigned: bool,
}

impl VerifyOptions {
    /// Policy that accepts unsigned tokens
    #[must_use]
    pub fn allowing_unsigned() -> Self {
        Self { allow_unsigned: true }
    }
}

/// Result of the end-to-end verify flow, split the way a report is printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Signature checked out
    Valid(DecodedToken),
    /// Token was readable but did not verify
    Invalid(String),
}

impl VerifyOutcome {
    /// Sort a verification result into an outcome; read failures stay errors
    ///
    /// # Errors
    /// Any error for which [`JwtError::is_verification_failure`] is false.
    pub fn from_result(result: JwtResult<DecodedToken>) -> JwtResult<Self> {
        match result {
            Ok(token) => Ok(VerifyOutcome::Valid(token)),
            Err(err) if err.is_verification_failure() => Ok(VerifyOutcome::Invalid(err.to_string())),
            Err(err) => Err(err),
        }
    }

    /// Whether the token verified
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyOutcome::Valid(_))
    }

    /// The verified token, if any
    #[must_use]
    pub fn token(&self) -> Option<&DecodedToken> {
        match self {
            VerifyOutcome::Valid(token) => Some(token),
            VerifyOutcome::Invalid(_) => None,
        }
    }

    /// `OK` or `INVALID: <reason>`
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            VerifyOutcome::Valid(_) => "OK".to_string(),
            VerifyOutcome::Invalid(reason) => format!("INVALID: {reason}"),
        }
    }
}

/// Fail with `AlgorithmMismatch` unless the header declares exactly `expected`
///
/// # Errors
/// `JwtError::AlgorithmMismatch`.
pub fn check_declared_alg(header: &Header, expected: Alg) -> JwtResult<()> {
    match header.algorithm() {
        Ok(declared) if declared == expected => Ok(()),
        _ => {
            debug!(expected = %expected, declared = %header.alg, "algorithm mismatch");
            Err(JwtError::algorithm_mismatch(expected.as_str(), &header.alg))
        }
    }
}

fn check_signature<V: JwsVerifier + ?Sized>(decoded: DecodedToken, verifier: &V) -> JwtResult<DecodedToken> {
    let alg = verifier.alg();
    if verifier.verify_signature(&decoded.signing_input(), decoded.signature())? {
        debug!(alg = %alg, "signature verified");
        Ok(decoded)
    } else {
        debug!(alg = %alg, "signature mismatch");
        Err(JwtError::signature_verification(alg.as_str()))
    }
}

/// Verify `token` with the default policy
///
/// # Errors
/// See [`verify_with_options`].
pub fn verify<V: JwsVerifier + ?Sized>(token: &str, verifier: &V) -> JwtResult<DecodedToken> {
    verify_with_options(token, verifier, VerifyOptions::default())
}

/// Verify `token` against an already-built verifier
///
/// # Errors
/// `JwtError::MalformedToken`/`JwtError::InvalidHeader` when the token cannot be read,
/// `JwtError::UnsupportedAlgorithm` for an unsecured verifier the policy does not allow,
/// `JwtError::AlgorithmMismatch` when the header declares another algorithm,
/// `JwtError::SignatureVerification` when the signature does not match.
pub fn verify_with_options<V: JwsVerifier + ?Sized>(
    token: &str,
    verifier: &V,
    options: VerifyOptions,
) -> JwtResult<DecodedToken> {
    let expected = verifier.alg();
    if expected.is_none() && !options.allow_unsigned {
        return Err(JwtError::unsupported_algorithm(expected.as_str()));
    }
    let decoded = decode(token)?;
    check_declared_alg(&decoded.header()?, expected)?;
    check_signature(decoded, verifier)
}

/// End-to-end verification from raw key bytes, returning the token or an error
///
/// Key material is loaded for `expected`, never for the header's `alg`, and only
/// after the header has been checked. For `expected == Alg::None` the key is ignored.
///
/// # Errors
/// As [`verify_with_options`], plus key loading errors.
pub fn verify_with_key(
    token: &str,
    expected: Alg,
    key: &[u8],
    options: VerifyOptions,
) -> JwtResult<DecodedToken> {
    if expected.is_none() && !options.allow_unsigned {
        return Err(JwtError::unsupported_algorithm(expected.as_str()));
    }
    let decoded = decode(token)?;
    check_declared_alg(&decoded.header()?, expected)?;

    if expected.is_none() {
        check_signature(decoded, &VerifyingAlgorithm::unsecured())
    } else {
        check_signature(decoded, &registry::for_verifying(expected, key)?)
    }
}

/// End-to-end verification reported as an [`VerifyOutcome`]
///
/// # Errors
/// Only read failures: malformed token, unreadable header, key or algorithm
/// resolution errors. Mismatched algorithms and bad signatures are `Invalid`.
pub fn verify_token(token: &str, expected: Alg, key: &[u8], options: VerifyOptions) -> JwtResult<VerifyOutcome> {
    VerifyOutcome::from_result(verify_with_key(token, expected, key, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSIGNED: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.e30.";

    #[test]
    fn unsigned_tokens_are_rejected_by_default() {
        assert_eq!(
            verify_with_key(UNSIGNED, Alg::None, b"", VerifyOptions::default()).err(),
            Some(JwtError::unsupported_algorithm("none"))
        );
        assert_eq!(
            verify(UNSIGNED, &VerifyingAlgorithm::unsecured()).err(),
            Some(JwtError::unsupported_algorithm("none"))
        );
    }

    #[test]
    fn unsigned_tokens_pass_when_allowed() {
        let outcome = verify_token(UNSIGNED, Alg::None, b"", VerifyOptions::allowing_unsigned());
        assert_eq!(outcome.as_ref().map(VerifyOutcome::message).ok(), Some("OK".to_string()));
    }

    #[test]
    fn unsigned_token_with_a_signature_is_invalid() {
        let token = format!("{UNSIGNED}c2ln");
        let outcome = verify_token(&token, Alg::None, b"", VerifyOptions::allowing_unsigned());
        assert_eq!(
            outcome.map(|o| o.message()).ok(),
            Some("INVALID: The token's signature resulted invalid when verified using the none algorithm".to_string())
        );
    }

    #[test]
    fn declared_alg_is_checked_before_the_key_is_loaded() {
        // The key is garbage; the mismatch must be reported first.
        let outcome = verify_token(UNSIGNED, Alg::Rs256, b"garbage", VerifyOptions::default());
        assert_eq!(
            outcome.map(|o| o.message()).ok(),
            Some("INVALID: Expected algorithm RS256, but got none".to_string())
        );
    }

    #[test]
    fn case_variants_of_none_are_not_unsigned() {
        let token = "eyJhbGciOiJOT05FIn0.e30.";
        let outcome = verify_token(token, Alg::None, b"", VerifyOptions::allowing_unsigned());
        assert_eq!(
            outcome.map(|o| o.message()).ok(),
            Some("INVALID: Expected algorithm none, but got NONE".to_string())
        );
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: Result<VerifyOptions, _> = serde_json::from_str("{}");
        assert_eq!(options.ok(), Some(VerifyOptions::default()));
        let options: Result<VerifyOptions, _> = serde_json::from_str(r#"{"allow_unsigned":true}"#);
        assert_eq!(options.ok(), Some(VerifyOptions::allowing_unsigned()));
    }
}
