//! Token verification and issuing
//!
//! Key material is owned by a [`TokenVerifier`] instance built once at
//! startup and shared behind an `Arc`. There is no process-global key
//! storage: every consumer gets the verifier it was constructed with.
//!
//! ## Security Design
//!
//! - **HS256 ONLY**: tokens signed with any other algorithm are rejected
//! - **No hardcoded keys**: the shared secret comes from configuration
//! - **Expiry enforced**: `exp` is required and validated on every call, with zero leeway

use crate::claims::JwtClaims;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::time::Duration;

/// JWT algorithm shared with the token issuer
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("token lifetime is out of range")]
    LifetimeOutOfRange,

    #[error("invalid credential: {0}")]
    InvalidCredential(#[from] jsonwebtoken::errors::Error),
}

/// Verifies (and, for tooling, issues) signed tracer-study credentials
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_lifetime: chrono::Duration,
}

impl TokenVerifier {
    /// Build a verifier from the shared secret and the lifetime of issued tokens
    ///
    /// ## Errors
    ///
    /// Returns error if the secret is empty or the lifetime does not fit a
    /// signed timestamp offset.
    pub fn new(secret: &str, token_lifetime: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let token_lifetime =
            chrono::Duration::from_std(token_lifetime).map_err(|_| TokenError::LifetimeOutOfRange)?;

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        // No clock-skew grace on exp
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_lifetime,
        })
    }

    /// Validate a token and return its claims
    ///
    /// Fails with [`TokenError::InvalidCredential`] when the token is
    /// malformed, signed with another key or algorithm, or expired.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Issue a token for the given identity with the configured lifetime
    pub fn issue(&self, id: u32, username: &str, roles: Vec<u32>) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            id,
            username: username.to_string(),
            roles,
            iat: now.timestamp(),
            exp: (now + self.token_lifetime).timestamp(),
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims as-is
    pub fn sign(&self, claims: &JwtClaims) -> Result<String, TokenError> {
        Ok(encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding_key)?)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &JWT_ALGORITHM)
            .field("token_lifetime", &self.token_lifetime)
            .finish_non_exhaustive()
    }
}
