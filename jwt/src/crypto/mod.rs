//! Signature engine
//!
//! Stateless sign/verify entry points dispatching on the algorithm family.
//! Unsigned tokens never reach this module; passing [`Algorithm::None`] is a
//! caller bug and reported as `UnsupportedAlgorithm`.

mod hmac;
mod rsa;

pub(crate) use self::rsa::{parse_private_key, parse_public_key};

use crate::algorithms::{Algorithm, Family, HashFunction};
use crate::error::{JwtError, JwtResult};

fn signing_hash(algorithm: Algorithm) -> JwtResult<HashFunction> {
    algorithm
        .hash()
        .ok_or_else(|| JwtError::unsupported_algorithm(algorithm.name()))
}

/// Produce the raw signature of `message`
///
/// For symmetric algorithms `key` is the shared secret; for asymmetric ones it
/// is a PKCS#8 DER private key.
///
/// # Errors
/// - `UnsupportedAlgorithm` for [`Algorithm::None`]
/// - `InvalidKey` if the key cannot be used with the primitive
/// - `CryptoFailure` if the primitive fails internally
pub fn sign(algorithm: Algorithm, key: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let hash = signing_hash(algorithm)?;
    tracing::trace!(alg = algorithm.name(), message_len = message.len(), "signing");
    match algorithm.family() {
        Family::Symmetric => hmac::sign(hash, key, message),
        Family::Asymmetric => rsa::sign(hash, key, message),
        Family::None => Err(JwtError::unsupported_algorithm(algorithm.name())),
    }
}

/// Check `signature` over `message`
///
/// For symmetric algorithms `key` is the shared secret; for asymmetric ones it
/// is an SPKI DER public key. A signature that does not match yields `Ok(false)`.
///
/// # Errors
/// - `UnsupportedAlgorithm` for [`Algorithm::None`]
/// - `InvalidKey` if the key cannot be used with the primitive
pub fn verify(
    algorithm: Algorithm,
    key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> JwtResult<bool> {
    let hash = signing_hash(algorithm)?;
    let valid = match algorithm.family() {
        Family::Symmetric => hmac::verify(hash, key, message, signature)?,
        Family::Asymmetric => rsa::verify(hash, key, message, signature)?,
        Family::None => return Err(JwtError::unsupported_algorithm(algorithm.name())),
    };
    tracing::trace!(alg = algorithm.name(), valid, "signature checked");
    Ok(valid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn none_never_reaches_a_primitive() {
        assert_eq!(
            sign(Algorithm::None, b"key", b"msg"),
            Err(JwtError::UnsupportedAlgorithm("none".to_string()))
        );
        assert!(matches!(
            verify(Algorithm::None, b"key", b"msg", b"sig"),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn symmetric_round_trip_through_engine() {
        let key = [9u8; 48];
        let sig = sign(Algorithm::Hs384, &key, b"header.payload").unwrap();
        assert!(verify(Algorithm::Hs384, &key, b"header.payload", &sig).unwrap());
        assert!(!verify(Algorithm::Hs512, &[9u8; 64], b"header.payload", &sig).unwrap());
    }

    #[test]
    fn malformed_rsa_keys_are_invalid_keys() {
        assert!(matches!(
            sign(Algorithm::Rs256, b"not a key", b"msg"),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            verify(Algorithm::Rs256, b"not a key", b"msg", b"sig"),
            Err(JwtError::InvalidKey(_))
        ));
    }
}
