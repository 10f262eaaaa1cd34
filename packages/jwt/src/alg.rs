//! JWS algorithm identifiers and the static algorithm table
//!
//! Every identifier has exactly one row in [`ALGORITHMS`]. The row says which
//! primitive family runs, which hash it is bound to and which key shape the
//! loader must produce. Adding an algorithm means adding a row and, if the family
//! is new, one primitive in [`crate::crypto`].

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// JWS algorithm identifier (RFC 7518 §3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alg {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    Ps256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    Ps384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    Ps512,
    /// No digital signature or MAC
    None,
}

/// Hash function bound to an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlg {
    /// Digest output length in bytes
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
            HashAlg::Sha512 => 64,
        }
    }

    /// Digest width in bits
    #[must_use]
    pub const fn bits(self) -> usize {
        self.output_len() * 8
    }

    /// Standard name, e.g. `SHA-256`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HashAlg::Sha256 => "SHA-256",
            HashAlg::Sha384 => "SHA-384",
            HashAlg::Sha512 => "SHA-512",
        }
    }
}

/// Elliptic curve named by an EC key or required by an ES algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
}

impl Curve {
    /// Standard curve name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        }
    }

    /// Fixed width of the JWS `r || s` signature encoding
    #[must_use]
    pub const fn signature_len(self) -> usize {
        match self {
            Curve::P256 => 64,
            Curve::P384 => 96,
            Curve::P521 => 132,
        }
    }
}

/// Primitive family an algorithm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// HMAC over a shared secret
    Hmac,
    /// RSASSA-PKCS1-v1_5
    RsaPkcs1,
    /// ECDSA on the given curve
    Ecdsa(Curve),
    /// RSASSA-PSS
    RsaPss,
    /// Unsecured JWS
    Unsecured,
}

/// Shape of key material an algorithm consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyShape {
    /// Raw secret bytes, used for both signing and verifying
    Secret,
    /// PEM-armored RSA key (PKCS#8 private / SPKI public)
    Rsa,
    /// PEM-armored EC key (PKCS#8 private / SPKI public)
    Ec,
    /// No key at all
    Absent,
}

/// One row of the algorithm table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSpec {
    /// Identifier this row describes
    pub alg: Alg,
    /// Primitive family
    pub family: Family,
    /// Bound hash function, `None` for the unsecured algorithm
    pub hash: Option<HashAlg>,
    /// Key material the loader must produce
    pub key_shape: KeyShape,
}

const fn row(alg: Alg, family: Family, hash: Option<HashAlg>, key_shape: KeyShape) -> AlgorithmSpec {
    AlgorithmSpec {
        alg,
        family,
        hash,
        key_shape,
    }
}

/// The algorithm table, one row per identifier
pub static ALGORITHMS: [AlgorithmSpec; 13] = [
    row(Alg::Hs256, Family::Hmac, Some(HashAlg::Sha256), KeyShape::Secret),
    row(Alg::Hs384, Family::Hmac, Some(HashAlg::Sha384), KeyShape::Secret),
    row(Alg::Hs512, Family::Hmac, Some(HashAlg::Sha512), KeyShape::Secret),
    row(Alg::Rs256, Family::RsaPkcs1, Some(HashAlg::Sha256), KeyShape::Rsa),
    row(Alg::Rs384, Family::RsaPkcs1, Some(HashAlg::Sha384), KeyShape::Rsa),
    row(Alg::Rs512, Family::RsaPkcs1, Some(HashAlg::Sha512), KeyShape::Rsa),
    row(Alg::Es256, Family::Ecdsa(Curve::P256), Some(HashAlg::Sha256), KeyShape::Ec),
    row(Alg::Es384, Family::Ecdsa(Curve::P384), Some(HashAlg::Sha384), KeyShape::Ec),
    row(Alg::Es512, Family::Ecdsa(Curve::P521), Some(HashAlg::Sha512), KeyShape::Ec),
    row(Alg::Ps256, Family::RsaPss, Some(HashAlg::Sha256), KeyShape::Rsa),
    row(Alg::Ps384, Family::RsaPss, Some(HashAlg::Sha384), KeyShape::Rsa),
    row(Alg::Ps512, Family::RsaPss, Some(HashAlg::Sha512), KeyShape::Rsa),
    row(Alg::None, Family::Unsecured, None, KeyShape::Absent),
];

impl Alg {
    /// Every identifier, in table order
    pub const ALL: [Alg; 13] = [
        Alg::Hs256,
        Alg::Hs384,
        Alg::Hs512,
        Alg::Rs256,
        Alg::Rs384,
        Alg::Rs512,
        Alg::Es256,
        Alg::Es384,
        Alg::Es512,
        Alg::Ps256,
        Alg::Ps384,
        Alg::Ps512,
        Alg::None,
    ];

    /// Identifiers that produce a signature or MAC
    pub const SIGNING: [Alg; 12] = [
        Alg::Hs256,
        Alg::Hs384,
        Alg::Hs512,
        Alg::Rs256,
        Alg::Rs384,
        Alg::Rs512,
        Alg::Es256,
        Alg::Es384,
        Alg::Es512,
        Alg::Ps256,
        Alg::Ps384,
        Alg::Ps512,
    ];

    /// Header `alg` value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Alg::Hs256 => "HS256",
            Alg::Hs384 => "HS384",
            Alg::Hs512 => "HS512",
            Alg::Rs256 => "RS256",
            Alg::Rs384 => "RS384",
            Alg::Rs512 => "RS512",
            Alg::Es256 => "ES256",
            Alg::Es384 => "ES384",
            Alg::Es512 => "ES512",
            Alg::Ps256 => "PS256",
            Alg::Ps384 => "PS384",
            Alg::Ps512 => "PS512",
            Alg::None => "none",
        }
    }

    /// This identifier's table row
    #[must_use]
    pub fn spec(self) -> &'static AlgorithmSpec {
        // The table is ordered like the enum.
        &ALGORITHMS[self as usize]
    }

    /// Primitive family
    #[must_use]
    pub fn family(self) -> Family {
        self.spec().family
    }

    /// Bound hash function, `None` for the unsecured algorithm
    #[must_use]
    pub fn hash(self) -> Option<HashAlg> {
        self.spec().hash
    }

    /// Key material shape the loader must produce
    #[must_use]
    pub fn key_shape(self) -> KeyShape {
        self.spec().key_shape
    }

    /// Whether this is the unsecured `none` algorithm
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Alg::None
    }

    /// Recommended minimum secret length for HMAC algorithms, in bytes
    ///
    /// A secret at least as long as the hash output; `None` for non-HMAC algorithms.
    #[must_use]
    pub fn recommended_secret_len(self) -> Option<usize> {
        match self.family() {
            Family::Hmac => self.hash().map(HashAlg::output_len),
            _ => None,
        }
    }
}

impl fmt::Display for Alg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alg {
    type Err = JwtError;

    fn from_str(s: &str) -> JwtResult<Self> {
        Alg::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JwtError::unsupported_algorithm(s))
    }
}

impl Serialize for Alg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Alg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
