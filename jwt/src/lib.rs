//! Compact signed authorization tokens
//!
//! This crate provides:
//! - HS256/384/512 (HMAC) and RS256/384/512 (RSA PKCS#1 v1.5) signing
//! - Signature-agnostic decoding and explicit verification
//! - Claim validation returning every failure as one bitmask
//! - Key generation with a portable base64 form
//!
//! ```
//! use sigil_jwt::{Algorithm, KeyMaterial, SerdeJson, Token, ValidationStatus, Validator, now_plus};
//!
//! # fn main() -> Result<(), sigil_jwt::JwtError> {
//! let key = KeyMaterial::generate(Algorithm::Hs384, 384)?;
//!
//! let mut token = Token::new();
//! token.set_algorithm(key.algorithm(), &key.signing_key()?);
//! token.add_claim("sub", "1234567890");
//! token.add_claim("admin", true);
//! token.set_expiration(now_plus(3600));
//! let encoded = token.encode(&SerdeJson)?;
//!
//! let mut received = Token::decode(&encoded, &SerdeJson)?;
//! received.set_algorithm(key.algorithm(), &key.verification_key()?);
//! assert!(received.verify(&encoded)?);
//!
//! let validator = Validator::new(Algorithm::Hs384)
//!     .with_exp_leeway(60)
//!     .require_claim("admin", true);
//! assert_eq!(validator.validate(&received), ValidationStatus::SUCCESS);
//! # Ok(())
//! # }
//! ```

mod algorithms;
pub mod codec;
pub mod crypto;
mod error;
mod json;
mod keys;
mod time;
mod token;
mod validation;

pub use algorithms::{Algorithm, Family, HashFunction};
pub use error::{JwtError, JwtResult};
pub use json::{JsonIn, JsonMap, JsonOut, SerdeJson};
pub use keys::{
    KeyMaterial, MAX_RSA_BITS, MIN_RSA_BITS, derive_public_from_private, hmac_key_from_b64,
    recommended_key_size, rsa_private_key_from_b64,
};
pub use time::{now_minus, now_plus, now_secs};
pub use token::{ALG_HEADER, EXP_CLAIM, IAT_CLAIM, NBF_CLAIM, Token};
pub use validation::{ValidationPolicy, ValidationStatus, Validator};
