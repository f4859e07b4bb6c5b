//! Post-verification token validation
//!
//! A [`Validator`] checks algorithm agreement, `exp`, `nbf` and required claim
//! values, and reports every failure at once as a [`ValidationStatus`] bitmask.

use crate::algorithms::Algorithm;
use crate::json::JsonMap;
use crate::time::now_secs;
use crate::token::{EXP_CLAIM, NBF_CLAIM, Token};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask of validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValidationStatus(u8);

impl ValidationStatus {
    /// No failure
    pub const SUCCESS: Self = Self(0);
    /// No token to validate
    pub const ERROR: Self = Self(1);
    /// Bound algorithm differs from the expected one
    pub const ALG_MISMATCH: Self = Self(2);
    /// `exp` has passed
    pub const EXPIRED: Self = Self(4);
    /// `nbf` has not been reached
    pub const TOO_NEW: Self = Self(8);
    /// A required claim is missing or has another value
    pub const GRANT_MISMATCH: Self = Self(16);

    const NAMED: [(Self, &'static str); 5] = [
        (Self::ERROR, "ERROR"),
        (Self::ALG_MISMATCH, "ALG_MISMATCH"),
        (Self::EXPIRED, "EXPIRED"),
        (Self::TOO_NEW, "TOO_NEW"),
        (Self::GRANT_MISMATCH, "GRANT_MISMATCH"),
    ];

    /// Raw bits
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build a status from raw bits, dropping unknown ones
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1_1111)
    }

    /// True when no failure flag is set
    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// True when every flag of `other` is set in `self`
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Names of the set flags, lowest bit first
    pub fn flag_names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for ValidationStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ValidationStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ValidationStatus {
    /// Space separated flag names, `SUCCESS` when none is set
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return f.write_str("SUCCESS");
        }
        let names: Vec<&str> = self.flag_names().collect();
        f.write_str(&names.join(" "))
    }
}

/// Serializable validation settings
///
/// ```
/// use sigil_jwt::{Algorithm, ValidationPolicy, Validator};
///
/// let policy: ValidationPolicy = serde_json::from_str(
///     r#"{ "algorithm": "HS256", "exp_leeway": 60, "required_claims": { "admin": true } }"#,
/// ).unwrap();
/// let validator = Validator::from(policy);
/// assert_eq!(validator.algorithm(), Algorithm::Hs256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Expected algorithm
    pub algorithm: Algorithm,
    /// Seconds `nbf` may lie in the future
    pub nbf_leeway: i64,
    /// Seconds `exp` may lie in the past
    pub exp_leeway: i64,
    /// Claims that must be present with exactly these values
    pub required_claims: JsonMap,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::None,
            nbf_leeway: 0,
            exp_leeway: 0,
            required_claims: JsonMap::new(),
        }
    }
}

/// Token validator
///
/// Configure before use; `validate` only reads, so a configured validator can
/// be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Validator {
    algorithm: Algorithm,
    nbf_leeway: i64,
    exp_leeway: i64,
    required_claims: JsonMap,
}

impl Validator {
    /// Validator expecting `algorithm`, with no leeway and no required claims
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            nbf_leeway: 0,
            exp_leeway: 0,
            required_claims: JsonMap::new(),
        }
    }

    /// Expected algorithm
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Not-before leeway in seconds
    #[must_use]
    pub fn nbf_leeway(&self) -> i64 {
        self.nbf_leeway
    }

    /// Expiration leeway in seconds
    #[must_use]
    pub fn exp_leeway(&self) -> i64 {
        self.exp_leeway
    }

    /// Required claims and their values
    #[must_use]
    pub fn required_claims(&self) -> &JsonMap {
        &self.required_claims
    }

    /// Set the not-before leeway
    pub fn set_nbf_leeway(&mut self, seconds: i64) {
        self.nbf_leeway = seconds;
    }

    /// Set the expiration leeway
    pub fn set_exp_leeway(&mut self, seconds: i64) {
        self.exp_leeway = seconds;
    }

    /// Require claim `name` to equal `value` (type-strict)
    pub fn add_required_claim(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.required_claims.insert(name.into(), value.into());
    }

    /// Builder form of [`set_nbf_leeway`](Self::set_nbf_leeway)
    #[must_use]
    pub fn with_nbf_leeway(mut self, seconds: i64) -> Self {
        self.set_nbf_leeway(seconds);
        self
    }

    /// Builder form of [`set_exp_leeway`](Self::set_exp_leeway)
    #[must_use]
    pub fn with_exp_leeway(mut self, seconds: i64) -> Self {
        self.set_exp_leeway(seconds);
        self
    }

    /// Builder form of [`add_required_claim`](Self::add_required_claim)
    #[must_use]
    pub fn require_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_required_claim(name, value);
        self
    }

    /// Validate against the current wall clock
    ///
    /// `None` yields [`ValidationStatus::ERROR`] alone.
    pub fn validate<'a>(&self, token: impl Into<Option<&'a Token>>) -> ValidationStatus {
        self.validate_at(token, now_secs())
    }

    /// Validate against an explicit clock value (seconds since the epoch)
    pub fn validate_at<'a>(
        &self,
        token: impl Into<Option<&'a Token>>,
        now: i64,
    ) -> ValidationStatus {
        let Some(token) = token.into() else {
            tracing::debug!("validation without a token");
            return ValidationStatus::ERROR;
        };

        let mut status = ValidationStatus::SUCCESS;

        if self.algorithm != token.algorithm() {
            status |= ValidationStatus::ALG_MISMATCH;
        }

        if let Some(exp) = numeric_claim(token, EXP_CLAIM)
            && now.saturating_sub(self.exp_leeway) >= exp
        {
            status |= ValidationStatus::EXPIRED;
        }

        if let Some(nbf) = numeric_claim(token, NBF_CLAIM)
            && now.saturating_add(self.nbf_leeway) < nbf
        {
            status |= ValidationStatus::TOO_NEW;
        }

        let grants_match = self
            .required_claims
            .iter()
            .all(|(name, required)| token.claim(name) == Some(required));
        if !grants_match {
            status |= ValidationStatus::GRANT_MISMATCH;
        }

        tracing::debug!(
            expected_alg = self.algorithm.name(),
            token_alg = token.algorithm().name(),
            now,
            status = %status,
            "validated token"
        );
        status
    }
}

impl From<ValidationPolicy> for Validator {
    fn from(policy: ValidationPolicy) -> Self {
        Self {
            algorithm: policy.algorithm,
            nbf_leeway: policy.nbf_leeway,
            exp_leeway: policy.exp_leeway,
            required_claims: policy.required_claims,
        }
    }
}

/// Numeric claim as whole seconds; non-numbers count as absent
fn numeric_claim(token: &Token, name: &str) -> Option<i64> {
    let Value::Number(value) = token.claim(name)? else {
        return None;
    };
    value.as_i64().or_else(|| {
        value
            .as_u64()
            .map(|v| i64::try_from(v).unwrap_or(i64::MAX))
            .or_else(|| value.as_f64().map(|v| v as i64))
    })
}
