//! Authentication domain service.
//!
//! Verifies credentials, issues tenant-scoped session tokens and answers
//! admin checks. Persistence goes through the `UserStore` and `AppStore`
//! traits; transport concerns live in `ClientConnection`.
//!
//! # Pre-conditions
//! - Emails and passwords are non-empty and ids are non-zero. The gateway
//!   validates this before calling in.
//!
//! # Post-conditions
//! - Every collaborator failure is classified into exactly one `AuthError`.
//! - A token is returned only after the password verified and the app
//!   resolved.
//!
//! # Invariants
//! - The service holds no mutable state; concurrent calls are independent.
//! - Passwords, hashes, secrets and tokens are never logged.

use std::sync::Arc;
use std::time::Duration;

use super::{PasswordHasher, TokenIssuer};
use crate::storage::{AppStore, StorageError, UserStore};
use crate::types::{AppId, UserId};

/// Outcome classes the service reports to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are deliberately the same.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The email is already registered.
    #[error("user already exists")]
    UserExists,
    /// The user id is not registered.
    #[error("user not found")]
    UserNotFound,
    /// The app id is not registered.
    #[error("app not found")]
    AppNotFound,
    /// Any other failure. Details are logged, not returned.
    #[error("internal error")]
    Internal,
}

/// Stateless authentication service.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    apps: Arc<dyn AppStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    token_ttl: Duration,
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        apps: Arc<dyn AppStore>,
        hasher: PasswordHasher,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            apps,
            hasher,
            issuer: TokenIssuer::new(),
            token_ttl,
        }
    }

    /// Replace the token issuer (used to pin the clock).
    #[must_use]
    pub fn with_token_issuer(mut self, issuer: TokenIssuer) -> Self {
        self.issuer = issuer;
        self
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Authenticate a user and issue a token for `app_id`.
    ///
    /// # Errors
    /// - `InvalidCredentials` if the email is unknown or the password is wrong.
    /// - `AppNotFound` if `app_id` does not resolve.
    /// - `Internal` on any store, hashing or signing failure.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError> {
        const OP: &str = "auth.login";

        tracing::info!(op = OP, email, %app_id, "attempting to log in user");

        let user = match self.users.user(email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                let hasher = self.hasher.clone();
                let password = password.to_string();
                run_blocking(move || hasher.verify_dummy(&password)).await?;

                tracing::warn!(op = OP, email, "user not found");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(op = OP, email, error = %e, "failed to get user");
                return Err(AuthError::Internal);
            }
        };

        let hasher = self.hasher.clone();
        let hash = user.password_hash.clone();
        let candidate = password.to_string();
        let verified = run_blocking(move || hasher.verify(&hash, &candidate)).await?;
        match verified {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(op = OP, email, "invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(op = OP, user_id = %user.id, error = %e, "stored hash unusable");
                return Err(AuthError::Internal);
            }
        }

        let app = match self.apps.app(app_id).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                tracing::warn!(op = OP, %app_id, "app not found");
                return Err(AuthError::AppNotFound);
            }
            Err(e) => {
                tracing::error!(op = OP, %app_id, error = %e, "failed to get app");
                return Err(AuthError::Internal);
            }
        };

        let token = self
            .issuer
            .issue(&user, &app, self.token_ttl)
            .map_err(|e| {
                tracing::error!(op = OP, %app_id, error = %e, "failed to generate token");
                AuthError::Internal
            })?;

        tracing::info!(op = OP, user_id = %user.id, %app_id, "user logged in");

        Ok(token)
    }

    /// Register a new user and return the assigned id.
    ///
    /// Uniqueness is enforced by the user store; this method takes no lock.
    ///
    /// # Errors
    /// - `UserExists` if the email is already registered.
    /// - `Internal` on hashing or any other store failure.
    pub async fn register_new_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        const OP: &str = "auth.register_new_user";

        tracing::info!(op = OP, email, "registering user");

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let password_hash = run_blocking(move || hasher.hash(&password))
            .await?
            .map_err(|e| {
                tracing::error!(op = OP, error = %e, "failed to generate password hash");
                AuthError::Internal
            })?;

        let id = match self.users.save_user(email, &password_hash).await {
            Ok(id) => id,
            Err(StorageError::UserExists) => {
                tracing::warn!(op = OP, email, "user already exists");
                return Err(AuthError::UserExists);
            }
            Err(e) => {
                tracing::error!(op = OP, email, error = %e, "failed to save user");
                return Err(AuthError::Internal);
            }
        };

        tracing::info!(op = OP, user_id = %id, "user registered");

        Ok(id)
    }

    /// Report whether the user holds the admin privilege.
    ///
    /// # Errors
    /// - `UserNotFound` if the id is unknown.
    /// - `Internal` on any other store failure.
    pub async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";

        tracing::info!(op = OP, %user_id, "checking if user is admin");

        let is_admin = match self.users.is_admin(user_id).await {
            Ok(is_admin) => is_admin,
            Err(StorageError::UserNotFound) => {
                tracing::warn!(op = OP, %user_id, "user not found");
                return Err(AuthError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(op = OP, %user_id, error = %e, "failed to check admin status");
                return Err(AuthError::Internal);
            }
        };

        tracing::info!(op = OP, %user_id, is_admin, "checked if user is admin");

        Ok(is_admin)
    }
}

/// Run CPU-bound work on the blocking pool.
///
/// Dropping the returned future abandons the result; the closure itself runs
/// to completion.
async fn run_blocking<F, R>(f: F) -> Result<R, AuthError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        AuthError::Internal
    })
}
