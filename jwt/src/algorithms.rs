//! JWT algorithm catalog
//!
//! The closed set of signing algorithms. Every variant carries its symbolic
//! name, the identifier of the primitive behind it and its family, so the
//! signature engine can dispatch with an exhaustive match.

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Unsigned tokens
    None,
    /// Shared-secret MAC (HMAC)
    Symmetric,
    /// Public/private key signatures (RSA)
    Asymmetric,
}

/// Hash function backing a MAC or signature primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashFunction {
    /// Digest output length in bytes
    #[inline]
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            HashFunction::Sha256 => 32,
            HashFunction::Sha384 => 48,
            HashFunction::Sha512 => 64,
        }
    }
}

/// Token signing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Unsigned token
    #[default]
    None,
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
}

impl Algorithm {
    /// Every supported algorithm, in catalog order
    pub const ALL: [Algorithm; 7] = [
        Algorithm::None,
        Algorithm::Hs256,
        Algorithm::Hs384,
        Algorithm::Hs512,
        Algorithm::Rs256,
        Algorithm::Rs384,
        Algorithm::Rs512,
    ];

    /// Resolve a symbolic name (`HS256`, `RS512`, `none`, ...) to an algorithm
    ///
    /// # Errors
    /// Returns `JwtError::UnknownAlgorithm` if the name is not in the catalog
    pub fn resolve(name: &str) -> JwtResult<Self> {
        match name {
            "none" | "NONE" => Ok(Algorithm::None),
            "HS256" => Ok(Algorithm::Hs256),
            "HS384" => Ok(Algorithm::Hs384),
            "HS512" => Ok(Algorithm::Hs512),
            "RS256" => Ok(Algorithm::Rs256),
            "RS384" => Ok(Algorithm::Rs384),
            "RS512" => Ok(Algorithm::Rs512),
            _ => Err(JwtError::unknown_algorithm(name)),
        }
    }

    /// Symbolic name as written in the `alg` header
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Hs256 => "HS256",
            Algorithm::Hs384 => "HS384",
            Algorithm::Hs512 => "HS512",
            Algorithm::Rs256 => "RS256",
            Algorithm::Rs384 => "RS384",
            Algorithm::Rs512 => "RS512",
        }
    }

    /// Identifier of the underlying primitive
    #[must_use]
    pub const fn primitive(self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Hs256 => "HmacSHA256",
            Algorithm::Hs384 => "HmacSHA384",
            Algorithm::Hs512 => "HmacSHA512",
            Algorithm::Rs256 => "SHA256withRSA",
            Algorithm::Rs384 => "SHA384withRSA",
            Algorithm::Rs512 => "SHA512withRSA",
        }
    }

    /// Family this algorithm belongs to
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Algorithm::None => Family::None,
            Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512 => Family::Symmetric,
            Algorithm::Rs256 | Algorithm::Rs384 | Algorithm::Rs512 => Family::Asymmetric,
        }
    }

    /// Hash function behind the primitive, `None` for unsigned tokens
    #[must_use]
    pub const fn hash(self) -> Option<HashFunction> {
        match self {
            Algorithm::None => None,
            Algorithm::Hs256 | Algorithm::Rs256 => Some(HashFunction::Sha256),
            Algorithm::Hs384 | Algorithm::Rs384 => Some(HashFunction::Sha384),
            Algorithm::Hs512 | Algorithm::Rs512 => Some(HashFunction::Sha512),
        }
    }

    /// Whether tokens using this algorithm carry a signature segment
    #[inline]
    #[must_use]
    pub const fn is_signed(self) -> bool {
        !matches!(self, Algorithm::None)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::resolve(s)
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Algorithm::resolve(&name).map_err(serde::de::Error::custom)
    }
}
