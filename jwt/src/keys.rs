//! Key material generation and portable encoding
//!
//! Symmetric keys travel as standard base64 of the raw secret; RSA keys as
//! standard base64 of the PKCS#8 DER private key. Public keys are derived from
//! the private key on demand, so only the private half has to be stored.

use crate::algorithms::{Algorithm, Family};
use crate::codec::{base64_decode, base64_encode};
use crate::crypto::parse_private_key;
use crate::error::{JwtError, JwtResult};
use rand::RngCore;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Smallest RSA modulus accepted for generation
pub const MIN_RSA_BITS: u32 = 2048;
/// Largest RSA modulus accepted for generation
pub const MAX_RSA_BITS: u32 = 16384;

/// Generated key in portable text form
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    #[zeroize(skip)]
    algorithm: Algorithm,
    key_size: u32,
    key_b64: String,
}

impl KeyMaterial {
    /// Generate fresh key material for `algorithm`
    ///
    /// Symmetric: `size_bits` of CSPRNG output. Asymmetric: an RSA key pair
    /// with a `size_bits` modulus, keeping the PKCS#8 private key.
    ///
    /// # Errors
    /// - `UnsupportedAlgorithm` for [`Algorithm::None`]
    /// - `InvalidKey` if `size_bits` is unusable for the algorithm
    /// - `CryptoFailure` if RSA generation or encoding fails
    pub fn generate(algorithm: Algorithm, size_bits: u32) -> JwtResult<Self> {
        validate_key_size(algorithm, size_bits)?;

        let key_b64 = match algorithm.family() {
            Family::Symmetric => {
                let mut secret = Zeroizing::new(vec![0u8; (size_bits / 8) as usize]);
                rand::rng().fill_bytes(&mut secret);
                base64_encode(&secret)
            }
            Family::Asymmetric => {
                let mut rng = rand::rng();
                let private_key = RsaPrivateKey::new(&mut rng, size_bits as usize).map_err(|e| {
                    JwtError::CryptoFailure(format!("RSA key generation failed: {e}"))
                })?;
                let private_der = private_key.to_pkcs8_der().map_err(|e| {
                    JwtError::CryptoFailure(format!("PKCS#8 encoding failed: {e}"))
                })?;
                base64_encode(private_der.as_bytes())
            }
            Family::None => return Err(JwtError::unsupported_algorithm(algorithm.name())),
        };

        tracing::debug!(alg = algorithm.name(), bits = size_bits, "generated key material");
        Ok(Self {
            algorithm,
            key_size: size_bits,
            key_b64,
        })
    }

    /// Wrap existing portable key text
    #[must_use]
    pub fn of(algorithm: Algorithm, key_size: u32, key_b64: impl Into<String>) -> Self {
        Self {
            algorithm,
            key_size,
            key_b64: key_b64.into(),
        }
    }

    /// Algorithm this key targets
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Requested key size in bits
    #[must_use]
    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    /// Portable form (standard base64)
    #[must_use]
    pub fn key_b64(&self) -> &str {
        &self.key_b64
    }

    /// Decoded portable form
    ///
    /// # Errors
    /// Returns `MalformedEncoding` if the text is not standard base64
    pub fn key_bytes(&self) -> JwtResult<Zeroizing<Vec<u8>>> {
        base64_decode(&self.key_b64).map(Zeroizing::new)
    }

    /// Bytes to bind on a token for signing
    ///
    /// # Errors
    /// - `UnsupportedAlgorithm` for [`Algorithm::None`]
    /// - `MalformedEncoding` / `InvalidKey` if the stored key is unusable
    pub fn signing_key(&self) -> JwtResult<Zeroizing<Vec<u8>>> {
        match self.algorithm.family() {
            Family::Symmetric => hmac_key_from_b64(&self.key_b64),
            Family::Asymmetric => rsa_private_key_from_b64(&self.key_b64),
            Family::None => Err(JwtError::unsupported_algorithm(self.algorithm.name())),
        }
    }

    /// Bytes to bind on a token for verification
    ///
    /// The shared secret for symmetric keys, the SPKI DER public key for RSA.
    ///
    /// # Errors
    /// Same as [`signing_key`](Self::signing_key), plus `CryptoFailure` if the
    /// public key cannot be encoded
    pub fn verification_key(&self) -> JwtResult<Zeroizing<Vec<u8>>> {
        match self.algorithm.family() {
            Family::Symmetric => hmac_key_from_b64(&self.key_b64),
            Family::Asymmetric => derive_public_from_private(&self.key_b64).map(Zeroizing::new),
            Family::None => Err(JwtError::unsupported_algorithm(self.algorithm.name())),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &self.algorithm)
            .field("key_size", &self.key_size)
            .field("key_b64", &"<redacted>")
            .finish()
    }
}

fn validate_key_size(algorithm: Algorithm, size_bits: u32) -> JwtResult<()> {
    if !algorithm.is_signed() {
        return Err(JwtError::unsupported_algorithm(algorithm.name()));
    }
    if size_bits == 0 || size_bits % 8 != 0 {
        return Err(JwtError::InvalidKey(format!(
            "key size must be a positive multiple of 8 bits, got {size_bits}"
        )));
    }
    match algorithm.family() {
        Family::Symmetric => {
            let min_bits = algorithm.hash().map_or(0, |h| h.output_len() * 8);
            if (size_bits as usize) < min_bits {
                return Err(JwtError::InvalidKey(format!(
                    "{algorithm} keys need at least {min_bits} bits, got {size_bits}"
                )));
            }
            Ok(())
        }
        Family::Asymmetric => {
            if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&size_bits) {
                return Err(JwtError::InvalidKey(format!(
                    "RSA modulus must be {MIN_RSA_BITS}..={MAX_RSA_BITS} bits, got {size_bits}"
                )));
            }
            Ok(())
        }
        Family::None => Err(JwtError::unsupported_algorithm(algorithm.name())),
    }
}

/// Default key size in bits for `algorithm`
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for [`Algorithm::None`]
pub fn recommended_key_size(algorithm: Algorithm) -> JwtResult<u32> {
    match algorithm {
        Algorithm::Hs256 => Ok(256),
        Algorithm::Hs384 => Ok(384),
        Algorithm::Hs512 => Ok(512),
        Algorithm::Rs256 | Algorithm::Rs384 | Algorithm::Rs512 => Ok(MIN_RSA_BITS),
        Algorithm::None => Err(JwtError::unsupported_algorithm(algorithm.name())),
    }
}

/// Decode a symmetric secret from its portable form
///
/// # Errors
/// - `MalformedEncoding` if the text is not standard base64
/// - `InvalidKey` if the secret is empty
pub fn hmac_key_from_b64(key_b64: &str) -> JwtResult<Zeroizing<Vec<u8>>> {
    let secret = Zeroizing::new(base64_decode(key_b64)?);
    if secret.is_empty() {
        return Err(JwtError::invalid_key("HMAC secret is empty"));
    }
    Ok(secret)
}

/// Decode and check a PKCS#8 DER RSA private key from its portable form
///
/// # Errors
/// - `MalformedEncoding` if the text is not standard base64
/// - `InvalidKey` if the bytes are not a PKCS#8 RSA private key
pub fn rsa_private_key_from_b64(private_key_b64: &str) -> JwtResult<Zeroizing<Vec<u8>>> {
    let der = Zeroizing::new(base64_decode(private_key_b64)?);
    parse_private_key(&der)?;
    Ok(der)
}

/// Rebuild the SPKI DER public key (modulus and public exponent) from an RSA private key
///
/// # Errors
/// - `MalformedEncoding` if the text is not standard base64
/// - `InvalidKey` if the bytes are not a PKCS#8 RSA private key
/// - `CryptoFailure` if the public key cannot be encoded
pub fn derive_public_from_private(private_key_b64: &str) -> JwtResult<Vec<u8>> {
    let der = Zeroizing::new(base64_decode(private_key_b64)?);
    let private_key = parse_private_key(&der)?;
    let public_key = RsaPublicKey::from(&private_key);
    let spki = public_key
        .to_public_key_der()
        .map_err(|e| JwtError::CryptoFailure(format!("SPKI encoding failed: {e}")))?;

    Ok(spki.as_bytes().to_vec())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_keys_have_requested_size() {
        for (alg, bits) in [
            (Algorithm::Hs256, 256),
            (Algorithm::Hs384, 384),
            (Algorithm::Hs512, 1024),
        ] {
            let key = KeyMaterial::generate(alg, bits).unwrap();
            assert_eq!(key.algorithm(), alg);
            assert_eq!(key.key_size(), bits);
            assert_eq!(key.key_bytes().unwrap().len(), (bits / 8) as usize);
        }
    }

    #[test]
    fn symmetric_keys_are_random() {
        let a = KeyMaterial::generate(Algorithm::Hs256, 256).unwrap();
        let b = KeyMaterial::generate(Algorithm::Hs256, 256).unwrap();
        assert_ne!(a.key_b64(), b.key_b64());
    }

    #[test]
    fn unusable_sizes_are_rejected() {
        assert!(matches!(
            KeyMaterial::generate(Algorithm::Hs384, 256),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            KeyMaterial::generate(Algorithm::Hs256, 260),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            KeyMaterial::generate(Algorithm::Rs256, 1024),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            KeyMaterial::generate(Algorithm::None, 256),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn recommended_sizes() {
        assert_eq!(recommended_key_size(Algorithm::Hs384), Ok(384));
        assert_eq!(recommended_key_size(Algorithm::Rs512), Ok(2048));
        assert!(recommended_key_size(Algorithm::None).is_err());
    }

    #[test]
    fn portable_form_must_be_standard_base64() {
        assert!(matches!(
            hmac_key_from_b64("not base64!"),
            Err(JwtError::MalformedEncoding(_))
        ));
        assert!(matches!(hmac_key_from_b64(""), Err(JwtError::InvalidKey(_))));
        assert!(matches!(
            rsa_private_key_from_b64(&base64_encode(b"garbage")),
            Err(JwtError::InvalidKey(_))
        ));
        assert!(matches!(
            derive_public_from_private(&base64_encode(b"garbage")),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let key = KeyMaterial::of(Algorithm::Hs256, 256, "c2VjcmV0");
        let rendered = format!("{key:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("c2VjcmV0"));
    }

    #[test]
    fn none_material_has_no_keys() {
        let key = KeyMaterial::of(Algorithm::None, 0, "");
        assert!(matches!(
            key.signing_key(),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            key.verification_key(),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }
}
