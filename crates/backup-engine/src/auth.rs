//! Bearer credential verification for the backup trigger.
//!

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The payload of a verified credential.
///
/// Only produced by [`TokenVerifier::verify`], after the signature, algorithm,
/// and expiry have been checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The destination URLs to replicate the backup to.
    pub urls: Option<Vec<String>>,

    /// Issued-at, seconds since epoch.
    pub iat: i64,

    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Verifies bearer credentials against a trust anchor.
///
/// The anchor is an RSA public key plus a single pinned algorithm, both
/// injected at construction so the key can be rotated without a rebuild.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier from a PEM encoded RSA public key and the pinned
    /// algorithm. Tokens using any other algorithm are rejected.
    pub fn from_pem(public_key: &[u8], algorithm: Algorithm) -> Result<Self, CreateVerifierError> {
        let key = DecodingKey::from_rsa_pem(public_key)?;
        let validation = Validation::new(algorithm);

        Ok(Self { key, validation })
    }

    /// Verifies a credential and returns its claims.
    ///
    /// An optional `"Bearer "` prefix is stripped before decoding. Pure
    /// function of the credential and the configured trust anchor.
    pub fn verify(&self, credential: Option<&str>) -> Result<Claims, AuthenticationError> {
        let credential = credential.unwrap_or_default();
        if credential.is_empty() {
            return Err(AuthenticationError::MissingToken);
        }

        let token = credential.strip_prefix("Bearer ").unwrap_or(credential);

        let token_data =
            decode::<Claims>(token, &self.key, &self.validation).map_err(|error| {
                match error.kind() {
                    ErrorKind::ExpiredSignature => AuthenticationError::TokenExpired,
                    _ => AuthenticationError::InvalidToken(error),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CreateVerifierError {
    #[error("Failed to read the public key:\n{0}")]
    InvalidPublicKey(#[from] jsonwebtoken::errors::Error),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("Missing authorization token.")]
    MissingToken,

    #[error("Token has expired.")]
    TokenExpired,

    #[error("Invalid token:\n{0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}
