//! Unit tests for credential verification
//!

use backup_engine::{AuthenticationError, Claims, TokenVerifier};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use shared::test::{TRUSTED_PRIVATE_KEY, TRUSTED_PUBLIC_KEY, UNTRUSTED_PRIVATE_KEY, init_test_logger};

fn verifier() -> TokenVerifier {
    TokenVerifier::from_pem(TRUSTED_PUBLIC_KEY.as_bytes(), Algorithm::RS256).unwrap()
}

fn mint(private_key: &str, algorithm: Algorithm, expires_in_seconds: i64) -> String {
    let now = Utc::now().timestamp();

    let claims = Claims {
        urls: Some(vec!["https://a.example/dst".to_string()]),
        iat: now,
        exp: now + expires_in_seconds,
    };

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).unwrap();

    encode(&Header::new(algorithm), &claims, &key).unwrap()
}

#[test]
fn valid_token_is_accepted() {
    let _logger = init_test_logger();
    let verifier = verifier();

    let token = mint(TRUSTED_PRIVATE_KEY, Algorithm::RS256, 300);

    let claims = verifier.verify(Some(&token)).unwrap();
    assert_eq!(
        claims.urls,
        Some(vec!["https://a.example/dst".to_string()])
    );
}

#[test]
fn bearer_prefix_is_stripped() {
    let _logger = init_test_logger();
    let verifier = verifier();

    let token = mint(TRUSTED_PRIVATE_KEY, Algorithm::RS256, 300);
    let credential = format!("Bearer {token}");

    let claims = verifier.verify(Some(&credential)).unwrap();
    assert!(claims.exp > claims.iat);
}

#[test]
fn expired_token_is_rejected() {
    let _logger = init_test_logger();
    let verifier = verifier();

    // Beyond the default validation leeway.
    let token = mint(TRUSTED_PRIVATE_KEY, Algorithm::RS256, -3600);

    let result = verifier.verify(Some(&token));
    assert!(matches!(result, Err(AuthenticationError::TokenExpired)));
}

#[test]
fn token_signed_with_a_different_key_is_rejected() {
    let _logger = init_test_logger();
    let verifier = verifier();

    let token = mint(UNTRUSTED_PRIVATE_KEY, Algorithm::RS256, 300);

    let result = verifier.verify(Some(&token));
    assert!(matches!(result, Err(AuthenticationError::InvalidToken(_))));
}

#[test]
fn token_using_an_alternate_algorithm_is_rejected() {
    let _logger = init_test_logger();
    let verifier = verifier();

    // Same trusted key, different algorithm than the pinned one.
    let token = mint(TRUSTED_PRIVATE_KEY, Algorithm::RS384, 300);

    let result = verifier.verify(Some(&token));
    assert!(matches!(result, Err(AuthenticationError::InvalidToken(_))));
}

#[test]
fn absent_credential_is_rejected() {
    let _logger = init_test_logger();
    let verifier = verifier();

    let result = verifier.verify(None);
    assert!(matches!(result, Err(AuthenticationError::MissingToken)));

    let result = verifier.verify(Some(""));
    assert!(matches!(result, Err(AuthenticationError::MissingToken)));
}

#[test]
fn garbage_credential_is_rejected() {
    let _logger = init_test_logger();
    let verifier = verifier();

    let result = verifier.verify(Some("Bearer invalid-token"));
    assert!(matches!(result, Err(AuthenticationError::InvalidToken(_))));
}
