//! Compact token decoding, with no verification

use crate::codec;
use crate::error::{JwtError, JwtResult};
use crate::types::DecodedToken;

fn segment(text: &str, name: &str) -> JwtResult<Vec<u8>> {
    codec::base64_url_decode(text)
        .map_err(|e| JwtError::malformed_token(&format!("{name} segment is not base64url: {e}")))
}

/// Split and base64url-decode a token
///
/// Surrounding whitespace is ignored. No algorithm is resolved and no signature is
/// checked; the header is not even required to be JSON at this point.
///
/// # Errors
/// `JwtError::MalformedToken` unless there are exactly three base64url segments.
pub fn decode(token: &str) -> JwtResult<DecodedToken> {
    let segments = codec::split(token.trim())?;
    let (header, payload, signature) = segments;
    Ok(DecodedToken::from_parts(
        segments,
        segment(header, "header")?,
        segment(payload, "payload")?,
        segment(signature, "signature")?,
    ))
}
