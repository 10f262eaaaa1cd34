//! RSA-PSS parameter binding: a signature made at one width never verifies at another

use jwt_util::crypto::pss::{self, PssParameters};
use jwt_util::keys::{load_pem_block, load_rsa_public_key};
use jwt_util::{
    Alg, JwtError, VerifyOptions, codec, decode, encode, for_signing, for_verifying, verify,
    verify_token,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const RSA_PRIVATE: &[u8] = include_bytes!("data/rsa-private.pem");
const RSA_PUBLIC: &[u8] = include_bytes!("data/rsa-public.pem");
const PS256_OPENSSL: &str = include_str!("data/ps256-openssl.jwt");
const PAYLOAD: &[u8] = br#"{"sub":"pss"}"#;

fn ps256_token() -> String {
    let signer = for_signing(Alg::Ps256, RSA_PRIVATE).expect("load");
    encode(None, PAYLOAD, &signer, &mut StdRng::seed_from_u64(17)).expect("sign")
}

#[test]
fn header_width_mismatch_fails_before_verification() {
    let token = ps256_token();
    for alg in [Alg::Ps384, Alg::Ps512] {
        let verifier = for_verifying(alg, RSA_PUBLIC).expect("load");
        assert_eq!(
            verify(&token, &verifier).err(),
            Some(JwtError::algorithm_mismatch(alg.as_str(), "PS256"))
        );
    }
}

#[test]
fn relabelled_header_does_not_carry_the_signature_across_widths() {
    // Keep the PS256 signature but claim PS384 in the header.
    let signer = for_signing(Alg::Ps256, RSA_PRIVATE).expect("load");
    let mut rng = StdRng::seed_from_u64(23);
    let token = encode(Some(br#"{"alg":"PS384","typ":"JWT"}"#.as_slice()), PAYLOAD, &signer, &mut rng)
        .expect("sign");

    let verifier = for_verifying(Alg::Ps384, RSA_PUBLIC).expect("load");
    assert_eq!(
        verify(&token, &verifier).err(),
        Some(JwtError::signature_verification("PS384"))
    );
}

#[test]
fn raw_parameters_reject_other_widths() {
    let decoded = decode(PS256_OPENSSL).expect("decode");
    let der = load_pem_block(RSA_PUBLIC).expect("pem");
    let key = load_rsa_public_key(&der).expect("key").key;
    let input = decoded.signing_input();

    for (bits, expected) in [(256, true), (384, false), (512, false)] {
        let params = PssParameters::for_bits(bits).expect("width");
        assert_eq!(pss::verify(&params, &key, &input, decoded.signature()), expected, "PS{bits}");
    }
}

#[test]
fn openssl_ps256_token_is_invalid_under_ps512() {
    let outcome = verify_token(PS256_OPENSSL, Alg::Ps512, RSA_PUBLIC, VerifyOptions::default())
        .expect("readable");
    assert_eq!(outcome.message(), "INVALID: Expected algorithm PS512, but got PS256");
}

#[test]
fn truncated_or_oversized_signatures_are_plain_failures() {
    let token = ps256_token();
    let decoded = decode(&token).expect("decode");
    let verifier = for_verifying(Alg::Ps256, RSA_PUBLIC).expect("load");

    let short = &decoded.signature()[..255];
    let mut long = decoded.signature().to_vec();
    long.push(0);
    for signature in [short.to_vec(), long, vec![0xff; 256]] {
        let forged = codec::assemble(
            decoded.header_segment(),
            decoded.payload_segment(),
            &codec::base64_url_encode(&signature),
        );
        assert_eq!(
            verify(&forged, &verifier).err(),
            Some(JwtError::signature_verification("PS256"))
        );
    }
}

#[test]
fn parameters_are_derived_not_chosen() {
    for alg in [Alg::Ps256, Alg::Ps384, Alg::Ps512] {
        let params = PssParameters::for_alg(alg).expect("PS alg");
        let hash = alg.hash().expect("hash");
        assert_eq!(params.hash(), hash);
        assert_eq!(params.mgf1_hash(), hash);
        assert_eq!(params.salt_len(), hash.output_len());
        assert_eq!(params.trailer_field(), PssParameters::TRAILER_FIELD);
    }
}
