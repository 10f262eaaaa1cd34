//! Compact token encoding

use crate::codec;
use crate::error::{JwtError, JwtResult};
use crate::traits::JwsSigner;
use crate::types::Header;
use rand_core::CryptoRngCore;
use tracing::{trace, warn};

/// Build the header bytes: the caller's JSON verbatim, or the default header
fn header_bytes(header_override: Option<&[u8]>, signer_alg: &str, default: &Header) -> JwtResult<Vec<u8>> {
    let Some(bytes) = header_override else {
        return default.to_json();
    };

    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| JwtError::invalid_header(&e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(JwtError::invalid_header("header must be a JSON object"));
    };

    // The override is used as-is; alg is never injected or rewritten.
    match object.get("alg").and_then(serde_json::Value::as_str) {
        Some(alg) if alg == signer_alg => {}
        Some(alg) => warn!(header_alg = alg, signer_alg, "header override declares a different alg"),
        None => warn!(signer_alg, "header override has no alg"),
    }
    Ok(bytes.to_vec())
}

/// Encode `payload` as a compact JWS signed by `signer`
///
/// Without an override the header is `{"alg":"<ALG>","typ":"JWT"}`. The payload is
/// not required to be JSON. An unsecured signer yields an empty signature segment.
///
/// # Errors
/// `JwtError::InvalidHeader` if the override is not a JSON object, or whatever the
/// signer returns.
pub fn encode<S: JwsSigner + ?Sized>(
    header_override: Option<&[u8]>,
    payload: &[u8],
    signer: &S,
    rng: &mut dyn CryptoRngCore,
) -> JwtResult<String> {
    let alg = signer.alg();
    let header = header_bytes(header_override, alg.as_str(), &Header::new(alg))?;

    let header_text = codec::base64_url_encode(&header);
    let payload_text = codec::base64_url_encode(payload);
    let signature = signer.sign(&codec::signing_input(&header_text, &payload_text), rng)?;

    trace!(alg = %alg, signature_len = signature.len(), "token encoded");
    Ok(codec::assemble(
        &header_text,
        &payload_text,
        &codec::base64_url_encode(&signature),
    ))
}
