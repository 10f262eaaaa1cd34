//! Base64url and JWS compact serialization framing

use crate::error::{JwtError, JwtResult};
use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

/// URL-safe alphabet, no padding on encode, padding accepted on decode (RFC 7515 §2)
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Segment separator in compact serialization
pub const SEPARATOR: char = '.';

/// Base64url-encode bytes without padding
#[inline]
#[must_use]
pub fn base64_url_encode(input: &[u8]) -> String {
    BASE64_URL.encode(input)
}

/// Base64url-decode text, with or without trailing `=` padding
///
/// # Errors
/// Returns `JwtError::Decoding` on characters outside the URL-safe alphabet or an
/// impossible length.
#[inline]
pub fn base64_url_decode(input: &str) -> JwtResult<Vec<u8>> {
    Ok(BASE64_URL.decode(input)?)
}

/// Join three base64url segments into a compact token
#[must_use]
pub fn assemble(header: &str, payload: &str, signature: &str) -> String {
    let mut token = String::with_capacity(header.len() + payload.len() + signature.len() + 2);
    token.push_str(header);
    token.push(SEPARATOR);
    token.push_str(payload);
    token.push(SEPARATOR);
    token.push_str(signature);
    token
}

/// Split a compact token into its header, payload and signature segments
///
/// # Errors
/// Returns `JwtError::MalformedToken` unless the token contains exactly two `.`.
pub fn split(token: &str) -> JwtResult<(&str, &str, &str)> {
    let mut parts = token.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => {
            let separators = token.matches(SEPARATOR).count();
            tracing::trace!(separators, "token rejected by splitter");
            Err(JwtError::malformed_token(&format!(
                "expected 3 segments separated by '.', found {}",
                separators + 1
            )))
        }
    }
}

/// Bytes every algorithm signs: the ASCII of `header.payload` as it appears on the wire
#[must_use]
pub fn signing_input(header: &str, payload: &str) -> Vec<u8> {
    let mut input = Vec::with_capacity(header.len() + payload.len() + 1);
    input.extend_from_slice(header.as_bytes());
    input.push(b'.');
    input.extend_from_slice(payload.as_bytes());
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 4648 §10 vectors, unpadded
    const VECTORS: [(&str, &str); 7] = [
        ("", ""),
        ("f", "Zg"),
        ("fo", "Zm8"),
        ("foo", "Zm9v"),
        ("foob", "Zm9vYg"),
        ("fooba", "Zm9vYmE"),
        ("foobar", "Zm9vYmFy"),
    ];

    #[test]
    fn rfc4648_vectors_encode_without_padding() {
        for (plain, encoded) in VECTORS {
            assert_eq!(base64_url_encode(plain.as_bytes()), encoded);
            assert_eq!(base64_url_decode(encoded).ok(), Some(plain.as_bytes().to_vec()));
        }
    }

    #[test]
    fn decode_tolerates_padding() {
        assert_eq!(base64_url_decode("Zg==").ok(), Some(b"f".to_vec()));
        assert_eq!(base64_url_decode("Zm9vYmE=").ok(), Some(b"fooba".to_vec()));
    }

    #[test]
    fn decode_uses_url_safe_alphabet() {
        assert_eq!(base64_url_decode("-_8").ok(), Some(vec![0xfb, 0xff]));
        assert!(matches!(base64_url_decode("+/8"), Err(JwtError::Decoding(_))));
        assert!(matches!(base64_url_decode("Zm9v!"), Err(JwtError::Decoding(_))));
    }

    #[test]
    fn split_requires_exactly_two_separators() {
        assert_eq!(split("a.b.c").ok(), Some(("a", "b", "c")));
        assert_eq!(split("a.b.").ok(), Some(("a", "b", "")));
        assert!(matches!(split("a.b"), Err(JwtError::MalformedToken(_))));
        assert!(matches!(split("a.b.c.d"), Err(JwtError::MalformedToken(_))));
        assert!(matches!(split(""), Err(JwtError::MalformedToken(_))));
    }

    #[test]
    fn assemble_and_signing_input_agree() {
        let token = assemble("aGVhZA", "Ym9keQ", "c2ln");
        assert_eq!(token, "aGVhZA.Ym9keQ.c2ln");
        assert_eq!(signing_input("aGVhZA", "Ym9keQ"), b"aGVhZA.Ym9keQ".to_vec());
    }
}
