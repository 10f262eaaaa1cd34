//! ECDSA for ES256 (P-256), ES384 (P-384) and ES512 (P-521)
//!
//! Signatures use the JWS fixed-width `r || s` layout, not DER. Nonces are derived
//! per RFC 6979, so signing needs no randomness.

use crate::error::{JwtError, JwtResult};
use crate::keys::{EcSigningKey, EcVerifyingKey};
use p256::ecdsa::signature::{Signer, Verifier};

/// Sign `message` with the curve's bound hash
///
/// # Errors
/// `JwtError::SignatureGeneration` if the primitive fails.
pub fn sign(key: &EcSigningKey, message: &[u8]) -> JwtResult<Vec<u8>> {
    let failed = |e: p256::ecdsa::Error| {
        JwtError::signature_generation(&format!("ECDSA {}: {e}", key.curve().name()))
    };
    Ok(match key {
        EcSigningKey::P256(k) => {
            let sig: p256::ecdsa::Signature = k.try_sign(message).map_err(failed)?;
            sig.to_bytes().to_vec()
        }
        EcSigningKey::P384(k) => {
            let sig: p384::ecdsa::Signature = k.try_sign(message).map_err(failed)?;
            sig.to_bytes().to_vec()
        }
        EcSigningKey::P521(k) => {
            let sig: p521::ecdsa::Signature = k.try_sign(message).map_err(failed)?;
            sig.to_bytes().to_vec()
        }
    })
}

/// Verify an `r || s` signature; wrong length or any mismatch is `false`
#[must_use]
pub fn verify(key: &EcVerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != key.curve().signature_len() {
        return false;
    }
    match key {
        EcVerifyingKey::P256(k) => p256::ecdsa::Signature::from_slice(signature)
            .is_ok_and(|sig| k.verify(message, &sig).is_ok()),
        EcVerifyingKey::P384(k) => p384::ecdsa::Signature::from_slice(signature)
            .is_ok_and(|sig| k.verify(message, &sig).is_ok()),
        EcVerifyingKey::P521(k) => p521::ecdsa::Signature::from_slice(signature)
            .is_ok_and(|sig| k.verify(message, &sig).is_ok()),
    }
}
