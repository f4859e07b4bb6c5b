//! Key generation, portable form and public key derivation

#![allow(clippy::unwrap_used, clippy::expect_used)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use sigil_jwt::{
    Algorithm, JwtError, KeyMaterial, SerdeJson, Token, derive_public_from_private,
    hmac_key_from_b64, rsa_private_key_from_b64,
};

static RSA_KEY: Lazy<KeyMaterial> = Lazy::new(|| {
    KeyMaterial::generate(Algorithm::Rs256, 2048).expect("RSA key generation should succeed")
});

#[test]
fn derived_public_key_is_deterministic() {
    let first = derive_public_from_private(RSA_KEY.key_b64()).unwrap();
    let second = derive_public_from_private(RSA_KEY.key_b64()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.as_slice(), RSA_KEY.verification_key().unwrap().as_slice());

    // SPKI DER is a SEQUENCE and much shorter than the private key
    assert_eq!(first[0], 0x30);
    assert!(first.len() < RSA_KEY.key_bytes().unwrap().len());
}

#[test]
fn derived_public_key_verifies_tokens() {
    let mut token = Token::new();
    token.set_algorithm(Algorithm::Rs256, &RSA_KEY.signing_key().unwrap());
    token.add_claim("sub", "svc-billing");
    let encoded = token.encode(&SerdeJson).unwrap();

    let public_key = derive_public_from_private(RSA_KEY.key_b64()).unwrap();
    let mut received = Token::decode(&encoded, &SerdeJson).unwrap();
    received.set_algorithm(Algorithm::Rs256, &public_key);
    assert!(received.verify(&encoded).unwrap());
}

#[test]
fn one_rsa_key_serves_every_rs_algorithm() {
    for algorithm in [Algorithm::Rs256, Algorithm::Rs384, Algorithm::Rs512] {
        let key = KeyMaterial::of(algorithm, RSA_KEY.key_size(), RSA_KEY.key_b64());

        let mut token = Token::new();
        token.set_algorithm(algorithm, &key.signing_key().unwrap());
        let encoded = token.encode(&SerdeJson).unwrap();

        let mut verifier = Token::new();
        verifier.set_algorithm(algorithm, &key.verification_key().unwrap());
        assert!(verifier.verify(&encoded).unwrap(), "{algorithm} should verify");
    }
}

#[test]
fn portable_form_survives_json() {
    let generated = KeyMaterial::generate(Algorithm::Hs512, 512).unwrap();
    let json = serde_json::to_string(&generated).unwrap();
    assert!(json.contains("\"HS512\""));

    let restored: KeyMaterial = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, generated);
    assert_eq!(
        restored.signing_key().unwrap().as_slice(),
        generated.signing_key().unwrap().as_slice()
    );
}

#[test]
fn portable_form_is_standard_base64() {
    let key = KeyMaterial::generate(Algorithm::Hs256, 256).unwrap();
    let raw = STANDARD.decode(key.key_b64()).unwrap();
    assert_eq!(raw.len(), 32);
    assert_eq!(raw.as_slice(), hmac_key_from_b64(key.key_b64()).unwrap().as_slice());

    let der = STANDARD.decode(RSA_KEY.key_b64()).unwrap();
    assert_eq!(
        der.as_slice(),
        rsa_private_key_from_b64(RSA_KEY.key_b64()).unwrap().as_slice()
    );
}

#[test]
fn symmetric_keys_sign_and_verify_with_the_same_secret() {
    let key = KeyMaterial::generate(Algorithm::Hs384, 384).unwrap();
    assert_eq!(
        key.signing_key().unwrap().as_slice(),
        key.verification_key().unwrap().as_slice()
    );
}

#[test]
fn asymmetric_signing_and_verification_keys_differ() {
    let signing = RSA_KEY.signing_key().unwrap();
    let verification = RSA_KEY.verification_key().unwrap();
    assert_ne!(signing.as_slice(), verification.as_slice());
}

#[test]
fn public_keys_cannot_stand_in_for_private_keys() {
    let public_b64 = STANDARD.encode(derive_public_from_private(RSA_KEY.key_b64()).unwrap());
    assert!(matches!(
        derive_public_from_private(&public_b64),
        Err(JwtError::InvalidKey(_))
    ));
    assert!(matches!(
        rsa_private_key_from_b64(&public_b64),
        Err(JwtError::InvalidKey(_))
    ));
}

#[test]
fn generation_rejects_unusable_requests() {
    assert!(matches!(
        KeyMaterial::generate(Algorithm::None, 256),
        Err(JwtError::UnsupportedAlgorithm(_))
    ));
    assert!(matches!(
        KeyMaterial::generate(Algorithm::Hs512, 256),
        Err(JwtError::InvalidKey(_))
    ));
    assert!(matches!(
        KeyMaterial::generate(Algorithm::Rs512, 2047),
        Err(JwtError::InvalidKey(_))
    ));
    assert!(matches!(
        KeyMaterial::generate(Algorithm::Rs512, 0),
        Err(JwtError::InvalidKey(_))
    ));
}
