//! HMAC-based signing (HS256, HS384, HS512)

use crate::algorithms::HashFunction;
use crate::error::{JwtError, JwtResult};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Reject secrets shorter than the hash output
pub(crate) fn validate_hmac_key(secret: &[u8], hash: HashFunction) -> JwtResult<()> {
    let min_length = hash.output_len();
    if secret.len() < min_length {
        return Err(JwtError::InvalidKey(format!(
            "HMAC key must be at least {} bytes, got {}",
            min_length,
            secret.len()
        )));
    }
    Ok(())
}

fn compute<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| JwtError::invalid_key("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compute the MAC of `message` keyed by `secret`
pub(crate) fn sign(hash: HashFunction, secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    validate_hmac_key(secret, hash)?;
    match hash {
        HashFunction::Sha256 => compute::<HmacSha256>(secret, message),
        HashFunction::Sha384 => compute::<HmacSha384>(secret, message),
        HashFunction::Sha512 => compute::<HmacSha512>(secret, message),
    }
}

/// Recompute the MAC and compare it in constant time
pub(crate) fn verify(
    hash: HashFunction,
    secret: &[u8],
    message: &[u8],
    signature: &[u8],
) -> JwtResult<bool> {
    let expected = sign(hash, secret, message)?;
    Ok(expected.ct_eq(signature).into())
}
