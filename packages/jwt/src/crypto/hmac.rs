//! HMAC-SHA2 for HS256/HS384/HS512

use crate::alg::HashAlg;
use crate::error::{JwtError, JwtResult};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

fn keyed<M: Mac + digest::KeyInit>(secret: &[u8], message: &[u8]) -> JwtResult<M> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|e| JwtError::signature_generation(&format!("invalid HMAC key: {e}")))?;
    mac.update(message);
    Ok(mac)
}

/// Compute the MAC of `message` under `secret`
///
/// # Errors
/// `JwtError::SignatureGeneration` if the MAC rejects the key.
pub fn sign(hash: HashAlg, secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    Ok(match hash {
        HashAlg::Sha256 => keyed::<HmacSha256>(secret, message)?.finalize().into_bytes().to_vec(),
        HashAlg::Sha384 => keyed::<HmacSha384>(secret, message)?.finalize().into_bytes().to_vec(),
        HashAlg::Sha512 => keyed::<HmacSha512>(secret, message)?.finalize().into_bytes().to_vec(),
    })
}

/// Check `tag` against the MAC of `message` in constant time
///
/// # Errors
/// `JwtError::SignatureGeneration` if the MAC rejects the key.
pub fn verify(hash: HashAlg, secret: &[u8], message: &[u8], tag: &[u8]) -> JwtResult<bool> {
    Ok(match hash {
        HashAlg::Sha256 => keyed::<HmacSha256>(secret, message)?.verify_slice(tag).is_ok(),
        HashAlg::Sha384 => keyed::<HmacSha384>(secret, message)?.verify_slice(tag).is_ok(),
        HashAlg::Sha512 => keyed::<HmacSha512>(secret, message)?.verify_slice(tag).is_ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231 test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";

    #[test]
    fn rfc4231_case_2() {
        assert_eq!(
            sign(HashAlg::Sha256, KEY, DATA).ok(),
            Some(hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843").to_vec())
        );
        let tag512 = sign(HashAlg::Sha512, KEY, DATA).unwrap_or_default();
        assert_eq!(
            tag512,
            hex!(
                "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554"
                "9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
            )
            .to_vec()
        );
        assert_eq!(sign(HashAlg::Sha384, KEY, DATA).map(|t| t.len()).ok(), Some(48));
    }

    #[test]
    fn verify_rejects_wrong_and_truncated_tags() {
        let tag = sign(HashAlg::Sha256, KEY, DATA).unwrap_or_default();
        assert_eq!(verify(HashAlg::Sha256, KEY, DATA, &tag).ok(), Some(true));
        assert_eq!(verify(HashAlg::Sha256, b"jefe", DATA, &tag).ok(), Some(false));
        assert_eq!(verify(HashAlg::Sha256, KEY, DATA, &tag[..31]).ok(), Some(false));
        assert_eq!(verify(HashAlg::Sha384, KEY, DATA, &tag).ok(), Some(false));
    }

    #[test]
    fn empty_secret_is_accepted() {
        assert_eq!(sign(HashAlg::Sha256, b"", DATA).map(|t| t.len()).ok(), Some(32));
    }
}
