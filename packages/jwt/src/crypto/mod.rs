//! Signature primitives, one module per family

pub mod ecdsa;
pub mod hmac;
pub mod pss;
pub mod rsa;

use crate::alg::HashAlg;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Hash the concatenation of `parts` with the selected SHA-2 function
#[must_use]
pub fn digest(hash: HashAlg, parts: &[&[u8]]) -> Vec<u8> {
    fn run<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
        let mut hasher = D::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }

    match hash {
        HashAlg::Sha256 => run::<Sha256>(parts),
        HashAlg::Sha384 => run::<Sha384>(parts),
        HashAlg::Sha512 => run::<Sha512>(parts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn digest_concatenates_parts() {
        let whole = digest(HashAlg::Sha256, &[b"abc"]);
        assert_eq!(
            whole,
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad").to_vec()
        );
        assert_eq!(digest(HashAlg::Sha256, &[b"a", b"", b"bc"]), whole);
    }

    #[test]
    fn digest_width_follows_hash() {
        for hash in [HashAlg::Sha256, HashAlg::Sha384, HashAlg::Sha512] {
            assert_eq!(digest(hash, &[b"x"]).len(), hash.output_len());
        }
    }
}
