//! RSASSA-PKCS1-v1_5 for RS256/RS384/RS512

use crate::alg::HashAlg;
use crate::crypto::digest;
use crate::error::{JwtError, JwtResult};
use rand_core::CryptoRngCore;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

fn scheme(hash: HashAlg) -> Pkcs1v15Sign {
    match hash {
        HashAlg::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlg::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlg::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

/// Sign `message` with PKCS#1 v1.5 padding
///
/// The padding is deterministic; `rng` only blinds the private-key operation.
///
/// # Errors
/// `JwtError::SignatureGeneration` if the key is too small for the digest.
pub fn sign(
    hash: HashAlg,
    key: &RsaPrivateKey,
    message: &[u8],
    mut rng: &mut dyn CryptoRngCore,
) -> JwtResult<Vec<u8>> {
    let hashed = digest(hash, &[message]);
    key.sign_with_rng(&mut rng, scheme(hash), &hashed)
        .map_err(|e| JwtError::signature_generation(&format!("RSA PKCS#1 v1.5: {e}")))
}

/// Verify a PKCS#1 v1.5 signature; any mismatch is `false`
#[must_use]
pub fn verify(hash: HashAlg, key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> bool {
    let hashed = digest(hash, &[message]);
    key.verify(scheme(hash), &hashed, signature).is_ok()
}
