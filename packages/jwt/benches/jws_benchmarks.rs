//! Sign and verify throughput per algorithm family
//!
//! Keys are loaded once outside the timed loop; the numbers cover the signature
//! primitive plus compact-serialization framing.

#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jwt_util::{Alg, encode, for_signing, for_verifying, verify};
use rand::SeedableRng;
use rand::rngs::StdRng;

const PAYLOAD: &[u8] = br#"{"sub":"1234567890","name":"John Doe","admin":true}"#;

fn keys(alg: Alg) -> (&'static [u8], &'static [u8]) {
    const RSA_PRIVATE: &[u8] = include_bytes!("../tests/data/rsa-private.pem");
    const RSA_PUBLIC: &[u8] = include_bytes!("../tests/data/rsa-public.pem");
    const EC256_PRIVATE: &[u8] = include_bytes!("../tests/data/ec256-private.pem");
    const EC256_PUBLIC: &[u8] = include_bytes!("../tests/data/ec256-public.pem");
    const EC384_PRIVATE: &[u8] = include_bytes!("../tests/data/ec384-private.pem");
    const EC384_PUBLIC: &[u8] = include_bytes!("../tests/data/ec384-public.pem");
    const EC521_PRIVATE: &[u8] = include_bytes!("../tests/data/ec521-private.pem");
    const EC521_PUBLIC: &[u8] = include_bytes!("../tests/data/ec521-public.pem");
    const SECRET: &[u8] = include_bytes!("../tests/data/secret-hs512.bin");

    match alg {
        Alg::Hs256 | Alg::Hs384 | Alg::Hs512 => (SECRET, SECRET),
        Alg::Es256 => (EC256_PRIVATE, EC256_PUBLIC),
        Alg::Es384 => (EC384_PRIVATE, EC384_PUBLIC),
        Alg::Es512 => (EC521_PRIVATE, EC521_PUBLIC),
        _ => (RSA_PRIVATE, RSA_PUBLIC),
    }
}

/// Benchmark token signing
fn benchmark_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("jws_sign");
    let mut rng = StdRng::seed_from_u64(0);

    for alg in Alg::SIGNING {
        let signer = for_signing(alg, keys(alg).0).expect("signing key should load");
        group.bench_with_input(BenchmarkId::from_parameter(alg), &signer, |b, signer| {
            b.iter(|| {
                let token = encode(None, PAYLOAD, signer, &mut rng).expect("sign should succeed");
                std::hint::black_box(token);
            });
        });
    }
    group.finish();
}

/// Benchmark token verification
fn benchmark_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("jws_verify");
    let mut rng = StdRng::seed_from_u64(0);

    for alg in Alg::SIGNING {
        let (private, public) = keys(alg);
        let signer = for_signing(alg, private).expect("signing key should load");
        let verifier = for_verifying(alg, public).expect("verifying key should load");
        let token = encode(None, PAYLOAD, &signer, &mut rng).expect("sign should succeed");

        group.bench_with_input(BenchmarkId::from_parameter(alg), &token, |b, token| {
            b.iter(|| {
                let decoded = verify(token, &verifier).expect("verify should succeed");
                std::hint::black_box(decoded);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_sign, benchmark_verify);
criterion_main!(benches);
