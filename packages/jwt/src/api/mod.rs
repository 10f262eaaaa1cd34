//! Encoder, decoder and verifier, plus the builder entry point

pub mod builder;
pub mod decoder;
pub mod encoder;
pub mod verifier;

pub use builder::{Jwt, JwtBuilder};
pub use decoder::decode;
pub use encoder::encode;
pub use verifier::{
    VerifyOptions, VerifyOutcome, check_declared_alg, verify, verify_token, verify_with_key,
    verify_with_options,
};
