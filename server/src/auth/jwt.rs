//! Session token issuance and verification.
//!
//! Tokens are JWTs signed with the requesting tenant's own key.
//!
//! # Pre-conditions
//! - The tenant's HS256 secret must be non-empty.
//!
//! # Post-conditions
//! - An issued token carries `sub`, `email`, `app_id`, `iat` and `exp` claims.
//! - A token signed for one tenant fails verification under any other
//!   tenant's key.
//!
//! # Invariants
//! - Issuance and verification are stateless; tokens are never stored.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{App, SigningKey};
use crate::storage::User;
use crate::time::{SystemTimeSource, TimeSource};

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject claim: the user id in decimal.
    pub sub: String,
    /// Email of the authenticated user.
    pub email: String,
    /// Tenant the token was issued for.
    pub app_id: i32,
    /// Issued-at, seconds since Unix epoch.
    pub iat: u64,
    /// Expiry, seconds since Unix epoch.
    pub exp: u64,
}

/// Error returned when a token cannot be issued.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing key was unusable or encoding failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Error returned when JWT verification fails.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// The JWT signature is invalid.
    #[error("invalid JWT signature")]
    InvalidSignature,
    /// The JWT has expired.
    #[error("JWT has expired")]
    TokenExpired,
    /// The JWT is malformed or cannot be parsed.
    #[error("malformed JWT")]
    MalformedToken,
    /// The 'sub' claim is missing from the JWT.
    #[error("missing 'sub' claim in JWT")]
    MissingSubClaim,
    /// The decoding key could not be created from the provided configuration.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Builds and signs session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    time: Arc<dyn TimeSource>,
}

impl TokenIssuer {
    /// Create an issuer reading the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    /// Create an issuer reading the given clock.
    #[must_use]
    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self { time }
    }

    /// Issue a token for `user`, scoped to `app`, valid for `ttl`.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if the tenant's key is unusable.
    pub fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
        let now = self.time.now_secs();
        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            app_id: app.id.get(),
            iat: now,
            exp: now.saturating_add(ttl.as_secs()),
        };

        match &app.signing {
            SigningKey::Hs256 { secret } => {
                if secret.is_empty() {
                    return Err(TokenError::Signing("secret must be non-empty".to_string()));
                }
                encode(
                    &Header::new(Algorithm::HS256),
                    &claims,
                    &EncodingKey::from_secret(secret),
                )
                .map_err(|e| TokenError::Signing(e.to_string()))
            }
        }
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

/// Verifies a JWT against a tenant's key and returns its claims.
///
/// Checks the signature and expiry.
///
/// # Errors
/// Returns `JwtError` if verification fails for any reason.
pub fn verify_token(token: &str, signing: &SigningKey) -> Result<TokenClaims, JwtError> {
    match signing {
        SigningKey::Hs256 { secret } => verify_hs256(token, secret),
    }
}

fn verify_hs256(token: &str, secret: &[u8]) -> Result<TokenClaims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidKey("secret must be non-empty".to_string()));
    }

    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<TokenClaims>(token, &key, &validation).map_err(map_jwt_error)?;
    if token_data.claims.sub.is_empty() {
        return Err(JwtError::MissingSubClaim);
    }

    Ok(token_data.claims)
}

/// Maps jsonwebtoken errors to our `JwtError` type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::MissingRequiredClaim(_) => JwtError::MissingSubClaim,
        _ => JwtError::MalformedToken,
    }
}
