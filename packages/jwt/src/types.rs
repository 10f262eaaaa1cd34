//! JWT type definitions

use crate::alg::Alg;
use crate::codec;
use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};

/// JOSE header, reduced to the fields this crate acts on
///
/// Other members of a token's header are ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Declared algorithm, as written
    pub alg: String,
    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    /// The default header for `alg`: `{"alg":"<ALG>","typ":"JWT"}`
    #[must_use]
    pub fn new(alg: Alg) -> Self {
        Self {
            alg: alg.as_str().to_string(),
            typ: Some("JWT".to_string()),
        }
    }

    /// Parse header JSON bytes
    ///
    /// # Errors
    /// `JwtError::InvalidHeader` unless the bytes are a JSON object with a string `alg`.
    pub fn from_json(bytes: &[u8]) -> JwtResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| JwtError::invalid_header(&e.to_string()))
    }

    /// Serialize to compact JSON
    ///
    /// # Errors
    /// `JwtError::Serialization` if serde_json fails.
    pub fn to_json(&self) -> JwtResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Declared algorithm as an identifier
    ///
    /// # Errors
    /// `JwtError::UnsupportedAlgorithm` when the name is not a known identifier.
    pub fn algorithm(&self) -> JwtResult<Alg> {
        self.alg.parse()
    }
}

/// Selects one decoded segment of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Header JSON bytes
    Header,
    /// Payload bytes
    Payload,
    /// Raw signature bytes
    Signature,
}

/// A structurally parsed compact token; nothing about it has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    header_segment: String,
    payload_segment: String,
    signature_segment: String,
    header_json: Vec<u8>,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl DecodedToken {
    pub(crate) fn from_parts(
        segments: (&str, &str, &str),
        header_json: Vec<u8>,
        payload: Vec<u8>,
        signature: Vec<u8>,
    ) -> Self {
        let (header, payload_text, signature_text) = segments;
        Self {
            header_segment: header.to_string(),
            payload_segment: payload_text.to_string(),
            signature_segment: signature_text.to_string(),
            header_json,
            payload,
            signature,
        }
    }

    /// Base64url header text as it appeared in the token
    #[must_use]
    pub fn header_segment(&self) -> &str {
        &self.header_segment
    }

    /// Base64url payload text as it appeared in the token
    #[must_use]
    pub fn payload_segment(&self) -> &str {
        &self.payload_segment
    }

    /// Base64url signature text as it appeared in the token
    #[must_use]
    pub fn signature_segment(&self) -> &str {
        &self.signature_segment
    }

    /// Decoded header bytes, normally JSON
    #[must_use]
    pub fn header_json(&self) -> &[u8] {
        &self.header_json
    }

    /// Decoded payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Raw signature bytes
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Bytes of one segment
    #[must_use]
    pub fn view(&self, segment: Segment) -> &[u8] {
        match segment {
            Segment::Header => &self.header_json,
            Segment::Payload => &self.payload,
            Segment::Signature => &self.signature,
        }
    }

    /// Parse the header JSON
    ///
    /// # Errors
    /// `JwtError::InvalidHeader` if it is not an object with a string `alg`.
    pub fn header(&self) -> JwtResult<Header> {
        Header::from_json(&self.header_json)
    }

    /// The bytes the signature covers
    #[must_use]
    pub fn signing_input(&self) -> Vec<u8> {
        codec::signing_input(&self.header_segment, &self.payload_segment)
    }

    /// Take the payload bytes
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}
