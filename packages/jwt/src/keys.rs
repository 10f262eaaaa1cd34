//! Key material loading
//!
//! HMAC algorithms take the key source bytes verbatim as the secret. Every other
//! algorithm expects a PEM block holding a PKCS#8 private key or an X.509
//! SubjectPublicKeyInfo public key. The algorithm OID inside the DER decides the
//! key family, and for EC keys the named-curve parameter decides the curve.

use crate::alg::{Alg, Curve, Family, KeyShape};
use crate::error::{JwtError, JwtResult};
use pkcs8::ObjectIdentifier;
use pkcs8::spki::SubjectPublicKeyInfoRef;
use rand_core::CryptoRngCore;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use zeroize::Zeroizing;

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

const PEM_BEGIN: &[u8] = b"-----BEGIN ";

/// HMAC secret, wiped on drop
#[derive(Clone)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    /// Secret bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Secret length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({} bytes)", self.0.len())
    }
}

/// Which RSA signature schemes an RSA key was encoded for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaScheme {
    /// `rsaEncryption`: usable for PKCS#1 v1.5 and PSS
    Any,
    /// `id-RSASSA-PSS`: usable for PSS only
    PssOnly,
}

impl RsaScheme {
    fn from_oid(oid: ObjectIdentifier) -> JwtResult<Self> {
        if oid == RSA_ENCRYPTION {
            Ok(RsaScheme::Any)
        } else if oid == RSASSA_PSS {
            Ok(RsaScheme::PssOnly)
        } else {
            Err(JwtError::unsupported_key_algorithm(&format!(
                "expected an RSA key, found algorithm OID {oid}"
            )))
        }
    }

    /// Whether a key with this encoding may be used by `family`
    #[must_use]
    pub fn permits(self, family: Family) -> bool {
        match self {
            RsaScheme::Any => matches!(family, Family::RsaPkcs1 | Family::RsaPss),
            RsaScheme::PssOnly => family == Family::RsaPss,
        }
    }
}

/// RSA private key with the scheme its encoding allows
#[derive(Debug, Clone)]
pub struct RsaPrivate {
    /// The key
    pub key: RsaPrivateKey,
    /// Schemes the encoding allows
    pub scheme: RsaScheme,
}

/// RSA public key with the scheme its encoding allows
#[derive(Debug, Clone)]
pub struct RsaPublic {
    /// The key
    pub key: RsaPublicKey,
    /// Schemes the encoding allows
    pub scheme: RsaScheme,
}

/// ECDSA signing key, tagged by curve
#[derive(Clone)]
pub enum EcSigningKey {
    /// P-256 key
    P256(p256::ecdsa::SigningKey),
    /// P-384 key
    P384(p384::ecdsa::SigningKey),
    /// P-521 key
    P521(p521::ecdsa::SigningKey),
}

impl EcSigningKey {
    /// Curve this key lives on
    #[must_use]
    pub fn curve(&self) -> Curve {
        match self {
            EcSigningKey::P256(_) => Curve::P256,
            EcSigningKey::P384(_) => Curve::P384,
            EcSigningKey::P521(_) => Curve::P521,
        }
    }
}

impl fmt::Debug for EcSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcSigningKey({})", self.curve().name())
    }
}

/// ECDSA verifying key, tagged by curve
#[derive(Clone)]
pub enum EcVerifyingKey {
    /// P-256 key
    P256(p256::ecdsa::VerifyingKey),
    /// P-384 key
    P384(p384::ecdsa::VerifyingKey),
    /// P-521 key
    P521(p521::ecdsa::VerifyingKey),
}

impl EcVerifyingKey {
    /// Curve this key lives on
    #[must_use]
    pub fn curve(&self) -> Curve {
        match self {
            EcVerifyingKey::P256(_) => Curve::P256,
            EcVerifyingKey::P384(_) => Curve::P384,
            EcVerifyingKey::P521(_) => Curve::P521,
        }
    }
}

impl fmt::Debug for EcVerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcVerifyingKey({})", self.curve().name())
    }
}

/// Loaded key material, exactly one shape per operation
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    /// HMAC secret
    Secret(Secret),
    /// RSA private key
    RsaPrivate(RsaPrivate),
    /// RSA public key
    RsaPublic(RsaPublic),
    /// EC private key
    EcPrivate(EcSigningKey),
    /// EC public key
    EcPublic(EcVerifyingKey),
}

impl KeyMaterial {
    /// Short name of the variant, for error messages
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            KeyMaterial::Secret(_) => "secret",
            KeyMaterial::RsaPrivate(_) => "RSA private key",
            KeyMaterial::RsaPublic(_) => "RSA public key",
            KeyMaterial::EcPrivate(_) => "EC private key",
            KeyMaterial::EcPublic(_) => "EC public key",
        }
    }
}

/// Strip PEM armor and return the DER body
///
/// When the input holds several blocks, the first one labelled as a key wins
/// (so an `EC PARAMETERS` preamble is skipped); otherwise the first block.
///
/// # Errors
/// `JwtError::NoPemObjectFound` when there is no armor at all,
/// `JwtError::InvalidKeyEncoding` when the armor is incomplete or its body is not base64.
pub fn load_pem_block(bytes: &[u8]) -> JwtResult<Zeroizing<Vec<u8>>> {
    if !bytes.windows(PEM_BEGIN.len()).any(|w| w == PEM_BEGIN) {
        return Err(JwtError::NoPemObjectFound);
    }

    let blocks = pem::parse_many(bytes)
        .map_err(|e| JwtError::invalid_key_encoding(&format!("malformed PEM: {e}")))?;
    let mut blocks = blocks.into_iter();
    let first = blocks
        .next()
        .ok_or_else(|| JwtError::invalid_key_encoding("incomplete PEM armor"))?;
    let block = if first.tag().ends_with("KEY") {
        first
    } else {
        blocks.find(|b| b.tag().ends_with("KEY")).unwrap_or(first)
    };

    tracing::trace!(tag = block.tag(), len = block.contents().len(), "PEM block loaded");
    Ok(Zeroizing::new(block.contents().to_vec()))
}

/// Decode a PKCS#8 RSA private key
///
/// # Errors
/// `JwtError::InvalidKeyEncoding` for bad DER, `JwtError::UnsupportedKeyAlgorithm`
/// when the key is not RSA.
pub fn load_rsa_private_key(der: &[u8]) -> JwtResult<RsaPrivate> {
    let info = pkcs8::PrivateKeyInfo::try_from(der)
        .map_err(|e| JwtError::invalid_key_encoding(&format!("not a PKCS#8 private key: {e}")))?;
    let scheme = RsaScheme::from_oid(info.algorithm.oid)?;
    let key = RsaPrivateKey::from_pkcs1_der(info.private_key)
        .map_err(|e| JwtError::invalid_key_encoding(&format!("invalid RSA private key: {e}")))?;
    Ok(RsaPrivate { key, scheme })
}

/// Decode an X.509 SubjectPublicKeyInfo RSA public key
///
/// # Errors
/// `JwtError::InvalidKeyEncoding` for bad DER, `JwtError::UnsupportedKeyAlgorithm`
/// when the key is not RSA.
pub fn load_rsa_public_key(der: &[u8]) -> JwtResult<RsaPublic> {
    let spki = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| JwtError::invalid_key_encoding(&format!("not an X.509 public key: {e}")))?;
    let scheme = RsaScheme::from_oid(spki.algorithm.oid)?;
    let key = RsaPublicKey::from_pkcs1_der(spki.subject_public_key.raw_bytes())
        .map_err(|e| JwtError::invalid_key_encoding(&format!("invalid RSA public key: {e}")))?;
    Ok(RsaPublic { key, scheme })
}

fn ec_curve(algorithm: ObjectIdentifier, curve: pkcs8::spki::Result<ObjectIdentifier>) -> JwtResult<Curve> {
    if algorithm != EC_PUBLIC_KEY {
        return Err(JwtError::unsupported_key_algorithm(&format!(
            "expected an EC key, found algorithm OID {algorithm}"
        )));
    }
    let curve = curve.map_err(|e| {
        JwtError::invalid_key_encoding(&format!("EC key without named curve: {e}"))
    })?;
    [(SECP256R1, Curve::P256), (SECP384R1, Curve::P384), (SECP521R1, Curve::P521)]
        .into_iter()
        .find_map(|(oid, named)| (oid == curve).then_some(named))
        .ok_or_else(|| JwtError::unsupported_key_algorithm(&format!("unsupported EC curve OID {curve}")))
}

/// Decode a PKCS#8 EC private key; the curve comes from the encoding
///
/// # Errors
/// `JwtError::InvalidKeyEncoding` for bad DER, `JwtError::UnsupportedKeyAlgorithm`
/// when the key is not EC or the curve is not P-256/P-384/P-521.
pub fn load_ec_private_key(der: &[u8]) -> JwtResult<EcSigningKey> {
    use pkcs8::DecodePrivateKey;

    let info = pkcs8::PrivateKeyInfo::try_from(der)
        .map_err(|e| JwtError::invalid_key_encoding(&format!("not a PKCS#8 private key: {e}")))?;
    let curve = ec_curve(info.algorithm.oid, info.algorithm.parameters_oid())?;
    let invalid = |e: pkcs8::Error| {
        JwtError::invalid_key_encoding(&format!("invalid {} private key: {e}", curve.name()))
    };

    Ok(match curve {
        Curve::P256 => EcSigningKey::P256(p256::ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid)?),
        Curve::P384 => EcSigningKey::P384(p384::ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid)?),
        Curve::P521 => {
            let secret = p521::SecretKey::from_pkcs8_der(der).map_err(invalid)?;
            let key = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes()).map_err(|e| {
                JwtError::invalid_key_encoding(&format!("invalid P-521 private key: {e}"))
            })?;
            EcSigningKey::P521(key)
        }
    })
}

/// Decode an X.509 SubjectPublicKeyInfo EC public key; the curve comes from the encoding
///
/// # Errors
/// `JwtError::InvalidKeyEncoding` for bad DER, `JwtError::UnsupportedKeyAlgorithm`
/// when the key is not EC or the curve is not P-256/P-384/P-521.
pub fn load_ec_public_key(der: &[u8]) -> JwtResult<EcVerifyingKey> {
    use p521::elliptic_curve::sec1::ToEncodedPoint;
    use pkcs8::spki::DecodePublicKey;

    let spki = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| JwtError::invalid_key_encoding(&format!("not an X.509 public key: {e}")))?;
    let curve = ec_curve(spki.algorithm.oid, spki.algorithm.parameters_oid())?;
    let invalid = |e: pkcs8::spki::Error| {
        JwtError::invalid_key_encoding(&format!("invalid {} public key: {e}", curve.name()))
    };

    Ok(match curve {
        Curve::P256 => EcVerifyingKey::P256(p256::ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid)?),
        Curve::P384 => EcVerifyingKey::P384(p384::ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid)?),
        Curve::P521 => {
            let public = p521::PublicKey::from_public_key_der(der).map_err(invalid)?;
            let point = public.to_encoded_point(false);
            let key = p521::ecdsa::VerifyingKey::from_sec1_bytes(point.as_bytes()).map_err(|e| {
                JwtError::invalid_key_encoding(&format!("invalid P-521 public key: {e}"))
            })?;
            EcVerifyingKey::P521(key)
        }
    })
}

/// Use the bytes verbatim as an HMAC secret
///
/// No minimum length is enforced.
#[must_use]
pub fn load_secret(bytes: &[u8]) -> Secret {
    Secret(Zeroizing::new(bytes.to_vec()))
}

/// Load the private key or secret `alg` signs with from raw key source bytes
///
/// # Errors
/// `JwtError::UnsupportedAlgorithm` for `none`, otherwise any loader error, or
/// `JwtError::UnsupportedKeyAlgorithm` when the key's family or curve does not fit `alg`.
pub fn load_for_signing(alg: Alg, source: &[u8]) -> JwtResult<KeyMaterial> {
    let material = match alg.key_shape() {
        KeyShape::Secret => KeyMaterial::Secret(load_secret(source)),
        KeyShape::Rsa => KeyMaterial::RsaPrivate(load_rsa_private_key(&load_pem_block(source)?)?),
        KeyShape::Ec => KeyMaterial::EcPrivate(load_ec_private_key(&load_pem_block(source)?)?),
        KeyShape::Absent => return Err(JwtError::unsupported_algorithm(alg.as_str())),
    };
    ensure_fits(alg, &material)?;
    Ok(material)
}

/// Load the public key or secret `alg` verifies with from raw key source bytes
///
/// # Errors
/// Same as [`load_for_signing`].
pub fn load_for_verifying(alg: Alg, source: &[u8]) -> JwtResult<KeyMaterial> {
    let material = match alg.key_shape() {
        KeyShape::Secret => KeyMaterial::Secret(load_secret(source)),
        KeyShape::Rsa => KeyMaterial::RsaPublic(load_rsa_public_key(&load_pem_block(source)?)?),
        KeyShape::Ec => KeyMaterial::EcPublic(load_ec_public_key(&load_pem_block(source)?)?),
        KeyShape::Absent => return Err(JwtError::unsupported_algorithm(alg.as_str())),
    };
    ensure_fits(alg, &material)?;
    Ok(material)
}

/// Check that loaded material is shape-compatible with `alg`
///
/// # Errors
/// `JwtError::UnsupportedKeyAlgorithm` on any mismatch.
pub fn ensure_fits(alg: Alg, material: &KeyMaterial) -> JwtResult<()> {
    let family = alg.family();
    let fits = match (family, material) {
        (Family::Hmac, KeyMaterial::Secret(secret)) => {
            if let Some(recommended) = alg.recommended_secret_len()
                && secret.len() < recommended
            {
                tracing::warn!(
                    alg = %alg,
                    len = secret.len(),
                    recommended,
                    "HMAC secret is shorter than the hash output"
                );
            }
            true
        }
        (Family::RsaPkcs1 | Family::RsaPss, KeyMaterial::RsaPrivate(RsaPrivate { scheme, .. }))
        | (Family::RsaPkcs1 | Family::RsaPss, KeyMaterial::RsaPublic(RsaPublic { scheme, .. })) => {
            if !scheme.permits(family) {
                return Err(JwtError::unsupported_key_algorithm(&format!(
                    "RSASSA-PSS key cannot be used with {alg}"
                )));
            }
            true
        }
        (Family::Ecdsa(curve), KeyMaterial::EcPrivate(key)) => ensure_curve(alg, curve, key.curve())?,
        (Family::Ecdsa(curve), KeyMaterial::EcPublic(key)) => ensure_curve(alg, curve, key.curve())?,
        _ => false,
    };

    if fits {
        Ok(())
    } else {
        Err(JwtError::unsupported_key_algorithm(&format!(
            "{} cannot be used with {alg}",
            material.describe()
        )))
    }
}

fn ensure_curve(alg: Alg, required: Curve, actual: Curve) -> JwtResult<bool> {
    if required == actual {
        Ok(true)
    } else {
        Err(JwtError::unsupported_key_algorithm(&format!(
            "{alg} requires a {} key, found {}",
            required.name(),
            actual.name()
        )))
    }
}

/// Fill a fresh buffer from the caller's CSPRNG
#[must_use]
pub fn random_bytes(rng: &mut dyn CryptoRngCore, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}
