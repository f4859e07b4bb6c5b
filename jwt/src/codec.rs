//! Base64 encoding and decoding helpers
//!
//! Token segments use the URL-safe alphabet without padding (RFC 7515).
//! The portable key form uses the standard, padded alphabet.

use crate::error::{JwtError, JwtResult};
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};

/// Base64 URL-safe encoding without padding
#[inline]
#[must_use]
pub fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding
///
/// Padding characters and characters outside the URL-safe alphabet are rejected.
///
/// # Errors
/// Returns `JwtError::MalformedEncoding` if the input is not canonical base64url
#[inline]
pub fn base64_url_decode(input: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::MalformedEncoding(format!("invalid base64url: {e}")))
}

/// Encode UTF-8 text as base64url
#[inline]
#[must_use]
pub fn base64_url_encode_str(input: &str) -> String {
    base64_url_encode(input.as_bytes())
}

/// Decode base64url into UTF-8 text
///
/// # Errors
/// Returns `JwtError::MalformedEncoding` on invalid base64url or invalid UTF-8
pub fn base64_url_decode_str(input: &str) -> JwtResult<String> {
    let bytes = base64_url_decode(input)?;
    String::from_utf8(bytes)
        .map_err(|e| JwtError::MalformedEncoding(format!("segment is not UTF-8: {e}")))
}

/// Standard base64 encoding with padding
#[inline]
#[must_use]
pub fn base64_encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Standard base64 decoding with padding
///
/// # Errors
/// Returns `JwtError::MalformedEncoding` if the input is not valid base64
#[inline]
pub fn base64_decode(input: &str) -> JwtResult<Vec<u8>> {
    STANDARD
        .decode(input)
        .map_err(|e| JwtError::MalformedEncoding(format!("invalid base64: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn url_encoding_has_no_padding() {
        assert_eq!(base64_url_encode(b"a"), "YQ");
        assert_eq!(base64_url_encode(b"ab"), "YWI");
        assert_eq!(base64_url_encode(b"abc"), "YWJj");
        assert_eq!(base64_url_encode(&[0xfb, 0xff]), "-_8");
    }

    #[test]
    fn url_decoding_rejects_foreign_characters() {
        assert!(matches!(
            base64_url_decode("+/8"),
            Err(JwtError::MalformedEncoding(_))
        ));
        assert!(matches!(
            base64_url_decode("YQ=="),
            Err(JwtError::MalformedEncoding(_))
        ));
        assert!(base64_url_decode("Y Q").is_err());
        assert_eq!(base64_url_decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn text_variants_go_through_utf8() {
        let encoded = base64_url_encode_str("{\"alg\":\"HS256\"}");
        assert_eq!(encoded, "eyJhbGciOiJIUzI1NiJ9");
        assert_eq!(
            base64_url_decode_str(&encoded).unwrap(),
            "{\"alg\":\"HS256\"}"
        );
        let not_utf8 = base64_url_encode(&[0xff, 0xfe]);
        assert!(matches!(
            base64_url_decode_str(&not_utf8),
            Err(JwtError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn standard_alphabet_keeps_padding() {
        assert_eq!(base64_encode(&[0xfb, 0xff]), "+/8=");
        assert_eq!(base64_decode("+/8=").unwrap(), vec![0xfb, 0xff]);
        assert!(base64_decode("-_8").is_err());
    }

    proptest! {
        #[test]
        fn url_codec_is_lossless(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = base64_url_encode(&bytes);
            prop_assert!(!encoded.contains('='));
            prop_assert!(!encoded.contains('+'));
            prop_assert!(!encoded.contains('/'));
            prop_assert_eq!(base64_url_decode(&encoded).unwrap(), bytes);
        }
    }
}
