//! Signing and verifying seams.

use crate::alg::Alg;
use crate::error::JwtResult;
use rand_core::CryptoRngCore;

/// Produces JWS signatures.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait JwsSigner: Send + Sync {
    /// Header `alg` value.
    fn alg(&self) -> Alg;

    /// Sign the signing input (`header.payload` as ASCII) → raw signature bytes.
    fn sign(&self, message: &[u8], rng: &mut dyn CryptoRngCore) -> JwtResult<Vec<u8>>;
}

/// Checks JWS signatures.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait JwsVerifier: Send + Sync {
    /// Algorithm the token header must declare.
    fn alg(&self) -> Alg;

    /// `Ok(false)` on a signature mismatch; errors are reserved for unusable keys.
    fn verify_signature(&self, message: &[u8], signature: &[u8]) -> JwtResult<bool>;
}

/// Implementation of JwsSigner for Arc<T> to allow shared ownership.
impl<T: JwsSigner + ?Sized> JwsSigner for std::sync::Arc<T> {
    fn alg(&self) -> Alg {
        (**self).alg()
    }

    fn sign(&self, message: &[u8], rng: &mut dyn CryptoRngCore) -> JwtResult<Vec<u8>> {
        (**self).sign(message, rng)
    }
}

/// Implementation of JwsVerifier for Arc<T> to allow shared ownership.
impl<T: JwsVerifier + ?Sized> JwsVerifier for std::sync::Arc<T> {
    fn alg(&self) -> Alg {
        (**self).alg()
    }

    fn verify_signature(&self, message: &[u8], signature: &[u8]) -> JwtResult<bool> {
        (**self).verify_signature(message, signature)
    }
}
