//! Tenant application configuration.
//!
//! # Pre-conditions
//! - Signing secrets must be non-empty.
//!
//! # Post-conditions
//! - `App` instances are immutable once created.
//!
//! # Invariants
//! - `SigningKey::Hs256` secrets are never empty when built via `new_hs256`.
//! - Secret material never appears in `Debug` output.

use std::fmt;

use crate::types::AppId;

/// Error returned when signing configuration is invalid.
#[derive(Debug, thiserror::Error)]
pub enum SigningKeyError {
    /// The HS256 secret is empty.
    #[error("HS256 secret must not be empty")]
    EmptySecret,
}

/// Key material a tenant's tokens are signed with.
///
/// Each application carries its own key; a token signed for one app does not
/// verify under another.
#[derive(Clone)]
pub enum SigningKey {
    /// HMAC-SHA256 symmetric signing.
    Hs256 {
        /// The shared secret used for HMAC-SHA256.
        secret: Vec<u8>,
    },
}

impl SigningKey {
    /// Create a new HS256 signing key.
    ///
    /// # Errors
    /// Returns `SigningKeyError::EmptySecret` if the secret is empty.
    pub fn new_hs256(secret: Vec<u8>) -> Result<Self, SigningKeyError> {
        if secret.is_empty() {
            return Err(SigningKeyError::EmptySecret);
        }
        Ok(Self::Hs256 { secret })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hs256 { secret } => f
                .debug_struct("Hs256")
                .field("secret", &format_args!("<{} bytes redacted>", secret.len()))
                .finish(),
        }
    }
}

/// A tenant application that tokens are issued for.
#[derive(Debug, Clone)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub signing: SigningKey,
}
