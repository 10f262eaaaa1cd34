//! RSASSA-PSS for PS256/PS384/PS512 (RFC 8017 §8.1, EMSA-PSS §9.1)
//!
//! The encoding is built here on top of the raw RSA primitives. Parameters are
//! derived from the algorithm's bit-width and nothing else: SHA-b for the message
//! hash and for MGF1, a salt of b/8 bytes and trailer field 1 (RFC 4055). There is
//! no way for a caller to pick a different salt length or mask hash.

use crate::alg::{Alg, Family, HashAlg};
use crate::crypto::digest;
use crate::error::{JwtError, JwtResult};
use crate::keys::random_bytes;
use rand_core::CryptoRngCore;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use subtle::ConstantTimeEq;

const TRAILER_BYTE: u8 = 0xbc;
const PREFIX_ZEROS: [u8; 8] = [0u8; 8];

/// PSS parameters fixed by a PS bit-width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PssParameters {
    hash: HashAlg,
}

impl PssParameters {
    /// Trailer field value; always 1, meaning the `0xbc` trailer byte
    pub const TRAILER_FIELD: u8 = 1;

    /// Parameters for bit-width 256, 384 or 512
    ///
    /// # Errors
    /// `JwtError::UnsupportedAlgorithm` for any other width.
    pub fn for_bits(bits: usize) -> JwtResult<Self> {
        let hash = match bits {
            256 => HashAlg::Sha256,
            384 => HashAlg::Sha384,
            512 => HashAlg::Sha512,
            other => return Err(JwtError::unsupported_algorithm(&format!("PS{other}"))),
        };
        Ok(Self { hash })
    }

    /// Parameters for a PS algorithm identifier
    ///
    /// # Errors
    /// `JwtError::UnsupportedAlgorithm` when `alg` is not in the PS family.
    pub fn for_alg(alg: Alg) -> JwtResult<Self> {
        match (alg.family(), alg.hash()) {
            (Family::RsaPss, Some(hash)) => Self::for_bits(hash.bits()),
            _ => Err(JwtError::unsupported_algorithm(alg.as_str())),
        }
    }

    /// Algorithm these parameters belong to
    #[must_use]
    pub fn alg(&self) -> Alg {
        match self.hash {
            HashAlg::Sha256 => Alg::Ps256,
            HashAlg::Sha384 => Alg::Ps384,
            HashAlg::Sha512 => Alg::Ps512,
        }
    }

    /// Message hash
    #[must_use]
    pub fn hash(&self) -> HashAlg {
        self.hash
    }

    /// Hash used inside MGF1; always the message hash
    #[must_use]
    pub fn mgf1_hash(&self) -> HashAlg {
        self.hash
    }

    /// Salt length in bytes; always the hash output length
    #[must_use]
    pub fn salt_len(&self) -> usize {
        self.hash.output_len()
    }

    /// Trailer field
    #[must_use]
    pub fn trailer_field(&self) -> u8 {
        Self::TRAILER_FIELD
    }

    fn min_encoded_len(&self) -> usize {
        self.hash.output_len() + self.salt_len() + 2
    }
}

/// MGF1 mask of `len` bytes from `seed` (RFC 8017 §B.2.1)
#[must_use]
pub fn mgf1(hash: HashAlg, seed: &[u8], len: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(len + hash.output_len());
    let mut counter: u32 = 0;
    while mask.len() < len {
        mask.extend_from_slice(&digest(hash, &[seed, &counter.to_be_bytes()]));
        counter = counter.wrapping_add(1);
    }
    mask.truncate(len);
    mask
}

fn xor_in_place(target: &mut [u8], mask: &[u8]) {
    for (byte, m) in target.iter_mut().zip(mask) {
        *byte ^= m;
    }
}

/// Mask clearing the bits of the leftmost octet that lie above `em_bits`
fn top_octet_mask(em_len: usize, em_bits: usize) -> u8 {
    0xff >> (8 * em_len - em_bits)
}

/// EMSA-PSS-ENCODE with an explicit salt
///
/// # Errors
/// `JwtError::SignatureGeneration` when `em_bits` is too small for the parameters
/// or the salt has the wrong length.
pub fn emsa_pss_encode(
    params: &PssParameters,
    m_hash: &[u8],
    salt: &[u8],
    em_bits: usize,
) -> JwtResult<Vec<u8>> {
    let h_len = params.hash.output_len();
    let s_len = params.salt_len();
    let em_len = em_bits.div_ceil(8);

    if m_hash.len() != h_len || salt.len() != s_len {
        return Err(JwtError::signature_generation("PSS digest or salt has the wrong length"));
    }
    if em_len < params.min_encoded_len() {
        return Err(JwtError::signature_generation(&format!(
            "RSA modulus too small for {}",
            params.alg()
        )));
    }

    let h = digest(params.hash, &[&PREFIX_ZEROS, m_hash, salt]);

    // DB = PS || 0x01 || salt
    let db_len = em_len - h_len - 1;
    let mut db = vec![0u8; db_len];
    db[db_len - s_len - 1] = 0x01;
    db[db_len - s_len..].copy_from_slice(salt);

    xor_in_place(&mut db, &mgf1(params.mgf1_hash(), &h, db_len));
    db[0] &= top_octet_mask(em_len, em_bits);

    let mut em = db;
    em.extend_from_slice(&h);
    em.push(TRAILER_BYTE);
    Ok(em)
}

/// EMSA-PSS-VERIFY; any inconsistency is `false`
#[must_use]
pub fn emsa_pss_verify(params: &PssParameters, m_hash: &[u8], em: &[u8], em_bits: usize) -> bool {
    let h_len = params.hash.output_len();
    let s_len = params.salt_len();
    let em_len = em_bits.div_ceil(8);

    if m_hash.len() != h_len || em.len() != em_len || em_len < params.min_encoded_len() {
        return false;
    }
    if em[em_len - 1] != TRAILER_BYTE {
        return false;
    }

    let db_len = em_len - h_len - 1;
    let (masked_db, rest) = em.split_at(db_len);
    let h = &rest[..h_len];

    let top = top_octet_mask(em_len, em_bits);
    if masked_db[0] & !top != 0 {
        return false;
    }

    let mut db = masked_db.to_vec();
    xor_in_place(&mut db, &mgf1(params.mgf1_hash(), h, db_len));
    db[0] &= top;

    let ps_len = db_len - s_len - 1;
    if db[..ps_len].iter().any(|&b| b != 0) || db[ps_len] != 0x01 {
        return false;
    }

    let salt = &db[db_len - s_len..];
    let expected = digest(params.hash, &[&PREFIX_ZEROS, m_hash, salt]);
    expected.ct_eq(h).into()
}

/// Big-endian encoding of `x` left-padded to `len` bytes (I2OSP)
fn i2osp(x: &BigUint, len: usize) -> Option<Vec<u8>> {
    let bytes = x.to_bytes_be();
    if bytes.len() > len {
        return None;
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Some(out)
}

/// Sign `message` (RSASSA-PSS-SIGN)
///
/// A fresh salt is drawn from `rng`, which also blinds the private-key operation.
///
/// # Errors
/// `JwtError::SignatureGeneration` if the key is too small or the RSA primitive fails.
pub fn sign(
    params: &PssParameters,
    key: &RsaPrivateKey,
    message: &[u8],
    mut rng: &mut dyn CryptoRngCore,
) -> JwtResult<Vec<u8>> {
    let m_hash = digest(params.hash, &[message]);
    let salt = random_bytes(&mut *rng, params.salt_len());
    let em_bits = key.n().bits().saturating_sub(1);
    let em = emsa_pss_encode(params, &m_hash, &salt, em_bits)?;

    let m = BigUint::from_bytes_be(&em);
    let s = rsa::hazmat::rsa_decrypt_and_check(key, Some(&mut rng), &m)
        .map_err(|e| JwtError::signature_generation(&format!("RSA-PSS: {e}")))?;

    i2osp(&s, key.size())
        .ok_or_else(|| JwtError::signature_generation("RSA-PSS: signature wider than modulus"))
}

/// Verify `signature` over `message` (RSASSA-PSS-VERIFY)
///
/// Returns `false` for a wrong-length or out-of-range signature and for any
/// encoding mismatch.
#[must_use]
pub fn verify(params: &PssParameters, key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != key.size() {
        return false;
    }
    let s = BigUint::from_bytes_be(signature);
    if &s >= key.n() {
        return false;
    }

    let m = s.modpow(key.e(), key.n());
    let em_bits = key.n().bits().saturating_sub(1);
    let Some(em) = i2osp(&m, em_bits.div_ceil(8)) else {
        return false;
    };

    let m_hash = digest(params.hash, &[message]);
    emsa_pss_verify(params, &m_hash, &em, em_bits)
}
