//! RSA-based signing (RS256, RS384, RS512)
//!
//! RSASSA-PKCS1-v1_5. Private keys are PKCS#8 DER, public keys are SPKI DER.

use crate::algorithms::HashFunction;
use crate::error::{JwtError, JwtResult};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs8::{DecodePrivateKey, DecodePublicKey},
};

/// Parse a PKCS#8 DER private key
pub(crate) fn parse_private_key(private_key: &[u8]) -> JwtResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(private_key)
        .map_err(|e| JwtError::InvalidKey(format!("Invalid RSA private key: {e}")))
}

/// Parse an SPKI DER public key
pub(crate) fn parse_public_key(public_key: &[u8]) -> JwtResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(public_key)
        .map_err(|e| JwtError::InvalidKey(format!("Invalid RSA public key: {e}")))
}

/// Sign `message` with a PKCS#8 DER private key
pub(crate) fn sign(hash: HashFunction, private_key: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let private_key = parse_private_key(private_key)?;

    let signature = match hash {
        HashFunction::Sha256 => SigningKey::<Sha256>::new(private_key).try_sign(message),
        HashFunction::Sha384 => SigningKey::<Sha384>::new(private_key).try_sign(message),
        HashFunction::Sha512 => SigningKey::<Sha512>::new(private_key).try_sign(message),
    }
    .map_err(|e| JwtError::CryptoFailure(format!("RSA signing failed: {e}")))?;

    Ok(signature.to_bytes().as_ref().to_vec())
}

/// Check `signature` over `message` with an SPKI DER public key
pub(crate) fn verify(
    hash: HashFunction,
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> JwtResult<bool> {
    let public_key = parse_public_key(public_key)?;

    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };

    let outcome = match hash {
        HashFunction::Sha256 => VerifyingKey::<Sha256>::new(public_key).verify(message, &signature),
        HashFunction::Sha384 => VerifyingKey::<Sha384>::new(public_key).verify(message, &signature),
        HashFunction::Sha512 => VerifyingKey::<Sha512>::new(public_key).verify(message, &signature),
    };

    Ok(outcome.is_ok())
}
