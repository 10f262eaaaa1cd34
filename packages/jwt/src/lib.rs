//! JSON Web Token (JWT) issuing, inspection and verification
//!
//! This crate provides:
//! - the full JWS algorithm matrix: HS, RS, ES and PS at 256/384/512, plus `none`
//! - an in-crate RSASSA-PSS encoding whose parameters are fixed by the algorithm
//! - PEM key loading (PKCS#8 private, X.509 SubjectPublicKeyInfo public)
//! - compact serialization encode/decode and signature verification
//!
//! ```no_run
//! use jwt_util::{Alg, Jwt};
//!
//! # fn main() -> jwt_util::JwtResult<()> {
//! let jwt = Jwt::builder().with_algorithm(Alg::Hs256).with_secret(b"your-256-bit-secret");
//! let token = jwt.sign(br#"{"sub":"1234567890"}"#)?;
//! let decoded = jwt.verify(&token)?;
//! assert_eq!(decoded.payload(), br#"{"sub":"1234567890"}"#);
//! # Ok(())
//! # }
//! ```

pub mod alg;
pub mod api;
pub mod codec;
pub mod crypto;
mod error;
pub mod keys;
pub mod registry;
pub mod traits;
mod types;

pub use alg::{ALGORITHMS, Alg, AlgorithmSpec, Curve, Family, HashAlg, KeyShape};
pub use api::{
    Jwt, JwtBuilder, VerifyOptions, VerifyOutcome, decode, encode, verify, verify_token,
    verify_with_key, verify_with_options,
};
pub use error::*;
pub use keys::KeyMaterial;
pub use registry::{SigningAlgorithm, VerifyingAlgorithm, for_signing, for_verifying};
pub use traits::{JwsSigner, JwsVerifier};
pub use types::*;
