//! JWT builder API - entry point and configuration methods

use crate::alg::Alg;
use crate::api::{decoder, encoder, verifier};
use crate::api::verifier::{VerifyOptions, VerifyOutcome};
use crate::error::{JwtError, JwtResult};
use crate::registry::{self, SigningAlgorithm};
use crate::types::DecodedToken;
use rand_core::{CryptoRngCore, OsRng};
use std::fmt;
use zeroize::Zeroizing;

/// Direct builder entry point
pub struct Jwt;

impl Jwt {
    /// Create new JWT builder
    #[inline]
    #[must_use]
    pub fn builder() -> JwtBuilder {
        JwtBuilder::new()
    }
}

/// Unified JWT builder
///
/// Holds an algorithm, key source bytes, an optional header override and the
/// verification policy. Every operation resolves the algorithm afresh; nothing is
/// cached between calls.
#[derive(Clone)]
pub struct JwtBuilder {
    algorithm: Alg,
    key: Option<Zeroizing<Vec<u8>>>,
    header: Option<Vec<u8>>,
    options: VerifyOptions,
}

impl JwtBuilder {
    /// Create a builder for unsigned tokens with no key
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: Alg::None,
            key: None,
            header: None,
            options: VerifyOptions::default(),
        }
    }

    /// Set algorithm
    #[inline]
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Alg) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set key source bytes: a PEM key for RS/ES/PS, raw secret bytes for HS
    #[inline]
    #[must_use]
    pub fn with_key(mut self, key: &[u8]) -> Self {
        self.key = Some(Zeroizing::new(key.to_vec()));
        self
    }

    /// Set secret for symmetric algorithms
    #[inline]
    #[must_use]
    pub fn with_secret(self, secret: &[u8]) -> Self {
        self.with_key(secret)
    }

    /// Replace the default header with caller-supplied JSON, used verbatim
    #[inline]
    #[must_use]
    pub fn with_header(mut self, header_json: &[u8]) -> Self {
        self.header = Some(header_json.to_vec());
        self
    }

    /// Accept unsigned tokens when verifying with `Alg::None`
    #[inline]
    #[must_use]
    pub fn allow_unsigned(mut self, allow: bool) -> Self {
        self.options.allow_unsigned = allow;
        self
    }

    /// Set the whole verification policy
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Configured algorithm
    #[must_use]
    pub fn algorithm(&self) -> Alg {
        self.algorithm
    }

    /// Key source bytes; keyed algorithms never fall back to an empty key
    fn key_bytes(&self) -> JwtResult<&[u8]> {
        match &self.key {
            Some(key) => Ok(key.as_slice()),
            None if self.algorithm.is_none() => Ok(&[]),
            None => Err(JwtError::missing_key(self.algorithm.as_str())),
        }
    }

    /// Build the signing algorithm for the configured algorithm and key
    ///
    /// # Errors
    /// `JwtError::MissingKey` when a keyed algorithm has no key, key loading and
    /// resolution errors.
    pub fn signer(&self) -> JwtResult<SigningAlgorithm> {
        if self.algorithm.is_none() {
            Ok(SigningAlgorithm::unsecured())
        } else {
            registry::for_signing(self.algorithm, self.key_bytes()?)
        }
    }

    /// Sign `payload` using the operating system RNG
    ///
    /// # Errors
    /// See [`JwtBuilder::sign_with_rng`].
    pub fn sign(&self, payload: &[u8]) -> JwtResult<String> {
        self.sign_with_rng(payload, &mut OsRng)
    }

    /// Sign `payload` drawing randomness from `rng`
    ///
    /// # Errors
    /// Key loading errors, `JwtError::InvalidHeader` for a bad header override, or
    /// `JwtError::SignatureGeneration`.
    pub fn sign_with_rng(&self, payload: &[u8], rng: &mut dyn CryptoRngCore) -> JwtResult<String> {
        encoder::encode(self.header.as_deref(), payload, &self.signer()?, rng)
    }

    /// Structural decode without verification
    ///
    /// # Errors
    /// `JwtError::MalformedToken`.
    pub fn decode(&self, token: &str) -> JwtResult<DecodedToken> {
        decoder::decode(token)
    }

    /// Verify `token` with the configured algorithm, key and policy
    ///
    /// # Errors
    /// See [`verifier::verify_with_key`].
    pub fn verify(&self, token: &str) -> JwtResult<DecodedToken> {
        verifier::verify_with_key(token, self.algorithm, self.key_bytes()?, self.options)
    }

    /// Verify `token` and report `OK` / `INVALID: <reason>`
    ///
    /// # Errors
    /// Read failures only; see [`verifier::verify_token`].
    pub fn verify_outcome(&self, token: &str) -> JwtResult<VerifyOutcome> {
        verifier::verify_token(token, self.algorithm, self.key_bytes()?, self.options)
    }
}

impl Default for JwtBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JwtBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtBuilder")
            .field("algorithm", &self.algorithm)
            .field("key", &self.key.as_ref().map(|k| k.len()))
            .field("header", &self.header.as_ref().map(|h| String::from_utf8_lossy(h)))
            .field("options", &self.options)
            .finish()
    }
}
