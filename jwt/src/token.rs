//! Token entity: headers, claims and the bound algorithm/key
//!
//! Wire format: `base64url(header) "." base64url(payload) ["." base64url(signature)]`.
//! The header map always carries `alg`. On a token being built it tracks the
//! bound algorithm; on a decoded token it holds whatever the sender wrote.

use crate::algorithms::Algorithm;
use crate::codec::{base64_url_decode, base64_url_decode_str, base64_url_encode, base64_url_encode_str};
use crate::crypto;
use crate::error::{JwtError, JwtResult};
use crate::json::{JsonIn, JsonMap, JsonOut};
use serde_json::Value;
use std::fmt;
use zeroize::Zeroizing;

/// Header carrying the algorithm name
pub const ALG_HEADER: &str = "alg";
/// Expiration time claim
pub const EXP_CLAIM: &str = "exp";
/// Not-before claim
pub const NBF_CLAIM: &str = "nbf";
/// Issued-at claim
pub const IAT_CLAIM: &str = "iat";

/// Mutable token builder and holder
///
/// A fresh token is unsigned ([`Algorithm::None`]) with no key. Bind an
/// algorithm and key with [`Token::set_algorithm`] before encoding a signed
/// token or verifying one.
pub struct Token {
    algorithm: Algorithm,
    key: Zeroizing<Vec<u8>>,
    headers: JsonMap,
    claims: JsonMap,
}

impl Token {
    /// Create an empty, unsigned token
    #[must_use]
    pub fn new() -> Self {
        let mut headers = JsonMap::new();
        headers.insert(ALG_HEADER.to_string(), Value::from(Algorithm::None.name()));
        Self {
            algorithm: Algorithm::None,
            key: Zeroizing::new(Vec::new()),
            headers,
            claims: JsonMap::new(),
        }
    }

    /// Bind the algorithm and key used by [`encode`](Self::encode) and [`verify`](Self::verify)
    ///
    /// The key bytes are copied; the previously bound key is zeroized.
    /// Symmetric algorithms take the raw secret, asymmetric ones a PKCS#8 DER
    /// private key for signing or an SPKI DER public key for verification.
    /// The `alg` header is rewritten to the algorithm's name.
    pub fn set_algorithm(&mut self, algorithm: Algorithm, key: &[u8]) {
        self.algorithm = algorithm;
        self.key = Zeroizing::new(key.to_vec());
        self.headers
            .insert(ALG_HEADER.to_string(), Value::from(algorithm.name()));
    }

    /// Currently bound algorithm
    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether key bytes are bound
    #[inline]
    #[must_use]
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    /// Length of the bound key in bytes
    #[inline]
    #[must_use]
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// Add or replace a claim
    pub fn add_claim(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.claims.insert(name.into(), value.into());
    }

    /// Look up a claim
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// All claims, in insertion order
    #[must_use]
    pub fn claims(&self) -> &JsonMap {
        &self.claims
    }

    /// Add or replace a header
    ///
    /// `alg` always takes the bound algorithm's name, whatever `value` says;
    /// use [`set_algorithm`](Self::set_algorithm) to change it.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = if name == ALG_HEADER {
            Value::from(self.algorithm.name())
        } else {
            value.into()
        };
        self.headers.insert(name, value);
    }

    /// Look up a header
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }

    /// All headers, `alg` included, in insertion order
    #[must_use]
    pub fn headers(&self) -> &JsonMap {
        &self.headers
    }

    /// Set the `exp` claim (seconds since the epoch)
    pub fn set_expiration(&mut self, exp: i64) {
        self.add_claim(EXP_CLAIM, exp);
    }

    /// Set the `nbf` claim (seconds since the epoch)
    pub fn set_not_before(&mut self, nbf: i64) {
        self.add_claim(NBF_CLAIM, nbf);
    }

    /// Set the `iat` claim (seconds since the epoch)
    pub fn set_issued_at(&mut self, iat: i64) {
        self.add_claim(IAT_CLAIM, iat);
    }

    /// The `alg` header, if it is a string
    ///
    /// On a decoded token this is what the sender claims, not what was
    /// verified. Rebinding with [`set_algorithm`](Self::set_algorithm) replaces it.
    #[must_use]
    pub fn declared_algorithm(&self) -> Option<&str> {
        self.header(ALG_HEADER).and_then(Value::as_str)
    }

    /// Resolve the declared `alg` header against the catalog
    ///
    /// # Errors
    /// Returns `JwtError::UnknownAlgorithm` if the header is missing or not in the catalog
    pub fn algorithm_hint(&self) -> JwtResult<Algorithm> {
        match self.declared_algorithm() {
            Some(name) => Algorithm::resolve(name),
            None => Err(JwtError::unknown_algorithm("<missing alg header>")),
        }
    }

    /// Encode into the compact wire form
    ///
    /// Unsigned tokens produce two segments, signed ones three.
    ///
    /// # Errors
    /// - `Serialization` if the JSON collaborator fails
    /// - `InvalidKey` / `CryptoFailure` from the signature engine
    pub fn encode(&self, out: &impl JsonOut) -> JwtResult<String> {
        let mut header = JsonMap::new();
        header.insert(ALG_HEADER.to_string(), Value::from(self.algorithm.name()));
        for (name, value) in &self.headers {
            if name != ALG_HEADER {
                header.insert(name.clone(), value.clone());
            }
        }

        let header_json = out.to_json(&header)?;
        let payload_json = out.to_json(&self.claims)?;

        let header_b64 = base64_url_encode_str(&header_json);
        let payload_b64 = base64_url_encode_str(&payload_json);
        let mut token = format!("{header_b64}.{payload_b64}");

        if self.algorithm.is_signed() {
            let signature = crypto::sign(self.algorithm, &self.key, token.as_bytes())?;
            token.push('.');
            token.push_str(&base64_url_encode(&signature));
        }

        tracing::debug!(
            alg = self.algorithm.name(),
            claims = self.claims.len(),
            len = token.len(),
            "encoded token"
        );
        Ok(token)
    }

    /// Rebuild headers and claims from a token string without checking its signature
    ///
    /// The result is unsigned and has no key; bind both before calling
    /// [`verify`](Self::verify). The header map is kept as sent, `alg` included.
    ///
    /// # Errors
    /// - `MalformedToken` if the string has fewer than two segments
    /// - `MalformedEncoding` if a segment is not base64url UTF-8
    /// - `Serialization` if the JSON collaborator rejects a segment
    pub fn decode(token: &str, input: &impl JsonIn) -> JwtResult<Token> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() < 2 {
            return Err(JwtError::malformed_token(
                "expected at least header and payload segments",
            ));
        }

        let header_json = base64_url_decode_str(parts[0])?;
        let payload_json = base64_url_decode_str(parts[1])?;

        let mut decoded = Token::new();
        decoded.headers = input.parse_json(&header_json)?;
        decoded.claims = input.parse_json(&payload_json)?;

        tracing::debug!(
            segments = parts.len(),
            declared_alg = decoded.declared_algorithm().unwrap_or("<none>"),
            claims = decoded.claims.len(),
            "decoded token"
        );
        Ok(decoded)
    }

    /// Check the signature of `token` with the bound algorithm and key
    ///
    /// Only the first two segments of `token` are signed; the token's own
    /// headers and claims play no part. Anything other than exactly three
    /// segments (including unsigned tokens) is `Ok(false)`.
    ///
    /// # Errors
    /// - `UnsupportedAlgorithm` if the bound algorithm is [`Algorithm::None`] and
    ///   `token` has three segments
    /// - `MalformedEncoding` if the signature segment is not base64url
    /// - `InvalidKey` if the bound key cannot be used with the algorithm
    pub fn verify(&self, token: &str) -> JwtResult<bool> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            if parts.len() == 2 {
                tracing::warn!("unsigned token presented for verification");
            }
            tracing::debug!(segments = parts.len(), "token rejected: wrong segment count");
            return Ok(false);
        }

        if !self.algorithm.is_signed() {
            return Err(JwtError::unsupported_algorithm(self.algorithm.name()));
        }

        let signing_input = &token[..parts[0].len() + 1 + parts[1].len()];
        let signature = base64_url_decode(parts[2])?;

        let valid = crypto::verify(
            self.algorithm,
            &self.key,
            signing_input.as_bytes(),
            &signature,
        )?;
        tracing::debug!(alg = self.algorithm.name(), valid, "verified token");
        Ok(valid)
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("algorithm", &self.algorithm)
            .field("key", &format_args!("<{} bytes redacted>", self.key.len()))
            .field("headers", &self.headers)
            .field("claims", &self.claims)
            .finish()
    }
}
