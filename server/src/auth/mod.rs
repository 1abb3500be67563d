//! Authentication module.
//!
//! Password hashing, per-tenant token issuance and the service that ties
//! them to the user and application stores.
//!
//! # Pre-conditions
//! - Applications must be configured with valid signing keys.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - Tokens are only issued after successful credential verification.

pub mod app_config;
pub mod jwt;
pub mod password;
pub mod service;

pub use app_config::{App, SigningKey, SigningKeyError};
pub use jwt::{JwtError, TokenClaims, TokenError, TokenIssuer, verify_token};
pub use password::{HashParams, PasswordError, PasswordHasher};
pub use service::{AuthError, AuthService};
