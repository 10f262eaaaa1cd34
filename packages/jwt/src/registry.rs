//! Algorithm registry: identifier + key bytes → ready-to-use signing or verifying object
//!
//! The family in the algorithm table decides which loader runs and which primitive
//! is bound. The resulting objects own their key material and are immutable, so
//! they can be shared across threads.

use crate::alg::{Alg, Family, HashAlg};
use crate::crypto::{self, pss::PssParameters};
use crate::error::{JwtError, JwtResult};
use crate::keys::{self, EcSigningKey, EcVerifyingKey, KeyMaterial, RsaPrivate, RsaPublic, Secret};
use crate::traits::{JwsSigner, JwsVerifier};
use rand_core::CryptoRngCore;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use tracing::debug;

#[derive(Clone)]
enum SigningPrimitive {
    Hmac(HashAlg, Secret),
    RsaPkcs1(HashAlg, RsaPrivateKey),
    Ecdsa(EcSigningKey),
    RsaPss(PssParameters, RsaPrivateKey),
    Unsecured,
}

#[derive(Clone)]
enum VerifyingPrimitive {
    Hmac(HashAlg, Secret),
    RsaPkcs1(HashAlg, RsaPublicKey),
    Ecdsa(EcVerifyingKey),
    RsaPss(PssParameters, RsaPublicKey),
    Unsecured,
}

/// An algorithm bound to the key it signs with
#[derive(Clone)]
pub struct SigningAlgorithm {
    alg: Alg,
    primitive: SigningPrimitive,
}

/// An algorithm bound to the key it verifies with
#[derive(Clone)]
pub struct VerifyingAlgorithm {
    alg: Alg,
    primitive: VerifyingPrimitive,
}

fn hash_of(alg: Alg) -> JwtResult<HashAlg> {
    alg.hash().ok_or_else(|| JwtError::unsupported_algorithm(alg.as_str()))
}

fn wrong_material(alg: Alg, material: &KeyMaterial) -> JwtError {
    JwtError::unsupported_key_algorithm(&format!("{} cannot be used with {alg}", material.describe()))
}

/// Resolve `alg` and load its signing key from `key_bytes`
///
/// # Errors
/// `JwtError::UnsupportedAlgorithm` for `none`, otherwise any key loading error.
pub fn for_signing(alg: Alg, key_bytes: &[u8]) -> JwtResult<SigningAlgorithm> {
    if alg.is_none() {
        return Err(JwtError::unsupported_algorithm(alg.as_str()));
    }
    SigningAlgorithm::bind(alg, keys::load_for_signing(alg, key_bytes)?)
}

/// Resolve `alg` and load its verifying key from `key_bytes`
///
/// # Errors
/// `JwtError::UnsupportedAlgorithm` for `none`, otherwise any key loading error.
pub fn for_verifying(alg: Alg, key_bytes: &[u8]) -> JwtResult<VerifyingAlgorithm> {
    if alg.is_none() {
        return Err(JwtError::unsupported_algorithm(alg.as_str()));
    }
    VerifyingAlgorithm::bind(alg, keys::load_for_verifying(alg, key_bytes)?)
}

/// Resolve an algorithm name as it appears in a header, then [`for_signing`]
///
/// # Errors
/// `JwtError::UnsupportedAlgorithm` for unknown names and `none`.
pub fn for_signing_named(name: &str, key_bytes: &[u8]) -> JwtResult<SigningAlgorithm> {
    for_signing(name.parse()?, key_bytes)
}

/// Resolve an algorithm name as it appears in a header, then [`for_verifying`]
///
/// # Errors
/// `JwtError::UnsupportedAlgorithm` for unknown names and `none`.
pub fn for_verifying_named(name: &str, key_bytes: &[u8]) -> JwtResult<VerifyingAlgorithm> {
    for_verifying(name.parse()?, key_bytes)
}

impl SigningAlgorithm {
    /// The unsecured algorithm: produces an empty signature
    #[must_use]
    pub fn unsecured() -> Self {
        Self {
            alg: Alg::None,
            primitive: SigningPrimitive::Unsecured,
        }
    }

    /// Bind already-loaded key material to `alg`
    ///
    /// # Errors
    /// `JwtError::UnsupportedAlgorithm` for `none`,
    /// `JwtError::UnsupportedKeyAlgorithm` if the material does not fit `alg`.
    pub fn from_material(alg: Alg, material: KeyMaterial) -> JwtResult<Self> {
        if alg.is_none() {
            return Err(JwtError::unsupported_algorithm(alg.as_str()));
        }
        keys::ensure_fits(alg, &material)?;
        Self::bind(alg, material)
    }

    fn bind(alg: Alg, material: KeyMaterial) -> JwtResult<Self> {
        let primitive = match (alg.family(), material) {
            (Family::Hmac, KeyMaterial::Secret(secret)) => SigningPrimitive::Hmac(hash_of(alg)?, secret),
            (Family::RsaPkcs1, KeyMaterial::RsaPrivate(RsaPrivate { key, .. })) => {
                SigningPrimitive::RsaPkcs1(hash_of(alg)?, key)
            }
            (Family::RsaPss, KeyMaterial::RsaPrivate(RsaPrivate { key, .. })) => {
                SigningPrimitive::RsaPss(PssParameters::for_alg(alg)?, key)
            }
            (Family::Ecdsa(_), KeyMaterial::EcPrivate(key)) => SigningPrimitive::Ecdsa(key),
            (_, material) => return Err(wrong_material(alg, &material)),
        };
        debug!(alg = %alg, "signing algorithm resolved");
        Ok(Self { alg, primitive })
    }

    /// Algorithm identifier written to the header
    #[must_use]
    pub fn alg(&self) -> Alg {
        self.alg
    }

    /// Sign the JWS signing input
    ///
    /// # Errors
    /// `JwtError::SignatureGeneration` if the primitive fails; no partial signature
    /// is ever returned.
    pub fn sign(&self, message: &[u8], rng: &mut dyn CryptoRngCore) -> JwtResult<Vec<u8>> {
        match &self.primitive {
            SigningPrimitive::Hmac(hash, secret) => crypto::hmac::sign(*hash, secret.as_bytes(), message),
            SigningPrimitive::RsaPkcs1(hash, key) => crypto::rsa::sign(*hash, key, message, rng),
            SigningPrimitive::Ecdsa(key) => crypto::ecdsa::sign(key, message),
            SigningPrimitive::RsaPss(params, key) => crypto::pss::sign(params, key, message, rng),
            SigningPrimitive::Unsecured => Ok(Vec::new()),
        }
    }
}

impl VerifyingAlgorithm {
    /// The unsecured algorithm: accepts only an empty signature
    #[must_use]
    pub fn unsecured() -> Self {
        Self {
            alg: Alg::None,
            primitive: VerifyingPrimitive::Unsecured,
        }
    }

    /// Bind already-loaded key material to `alg`
    ///
    /// # Errors
    /// `JwtError::UnsupportedAlgorithm` for `none`,
    /// `JwtError::UnsupportedKeyAlgorithm` if the material does not fit `alg`.
    pub fn from_material(alg: Alg, material: KeyMaterial) -> JwtResult<Self> {
        if alg.is_none() {
            return Err(JwtError::unsupported_algorithm(alg.as_str()));
        }
        keys::ensure_fits(alg, &material)?;
        Self::bind(alg, material)
    }

    fn bind(alg: Alg, material: KeyMaterial) -> JwtResult<Self> {
        let primitive = match (alg.family(), material) {
            (Family::Hmac, KeyMaterial::Secret(secret)) => VerifyingPrimitive::Hmac(hash_of(alg)?, secret),
            (Family::RsaPkcs1, KeyMaterial::RsaPublic(RsaPublic { key, .. })) => {
                VerifyingPrimitive::RsaPkcs1(hash_of(alg)?, key)
            }
            (Family::RsaPss, KeyMaterial::RsaPublic(RsaPublic { key, .. })) => {
                VerifyingPrimitive::RsaPss(PssParameters::for_alg(alg)?, key)
            }
            (Family::Ecdsa(_), KeyMaterial::EcPublic(key)) => VerifyingPrimitive::Ecdsa(key),
            (_, material) => return Err(wrong_material(alg, &material)),
        };
        debug!(alg = %alg, "verifying algorithm resolved");
        Ok(Self { alg, primitive })
    }

    /// Algorithm identifier the token header must declare
    #[must_use]
    pub fn alg(&self) -> Alg {
        self.alg
    }

    /// Check `signature` over the JWS signing input
    ///
    /// A signature that does not match, has the wrong length or does not parse is
    /// `Ok(false)`.
    ///
    /// # Errors
    /// Only when the primitive cannot be set up with the key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        Ok(match &self.primitive {
            VerifyingPrimitive::Hmac(hash, secret) => {
                crypto::hmac::verify(*hash, secret.as_bytes(), message, signature)?
            }
            VerifyingPrimitive::RsaPkcs1(hash, key) => crypto::rsa::verify(*hash, key, message, signature),
            VerifyingPrimitive::Ecdsa(key) => crypto::ecdsa::verify(key, message, signature),
            VerifyingPrimitive::RsaPss(params, key) => crypto::pss::verify(params, key, message, signature),
            VerifyingPrimitive::Unsecured => signature.is_empty(),
        })
    }
}

impl fmt::Debug for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningAlgorithm").field("alg", &self.alg).finish_non_exhaustive()
    }
}

impl fmt::Debug for VerifyingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingAlgorithm").field("alg", &self.alg).finish_non_exhaustive()
    }
}

impl JwsSigner for SigningAlgorithm {
    fn alg(&self) -> Alg {
        self.alg
    }

    fn sign(&self, message: &[u8], rng: &mut dyn CryptoRngCore) -> JwtResult<Vec<u8>> {
        SigningAlgorithm::sign(self, message, rng)
    }
}

impl JwsVerifier for VerifyingAlgorithm {
    fn alg(&self) -> Alg {
        self.alg
    }

    fn verify_signature(&self, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        self.verify(message, signature)
    }
}
