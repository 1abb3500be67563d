//! Storage seam for users and applications.
//!
//! The auth service talks to persistence only through the `UserStore` and
//! `AppStore` traits defined here. Implementations own atomicity: in
//! particular `UserStore::save_user` must detect a duplicate email itself and
//! report `StorageError::UserExists`, because the service never serializes
//! registrations.
//!
//! # Cancellation
//!
//! Every method is `async`. Callers cancel an in-flight call by dropping its
//! future, so implementations must not rely on running to completion.

pub mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::auth::App;
use crate::types::{AppId, UserId};

pub use memory::MemoryStorage;

/// A registered user as held by the user store.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Encoded password hash. Opaque to everything except the hasher.
    pub password_hash: Vec<u8>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Errors reported by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A user with this email is already registered.
    #[error("user already exists")]
    UserExists,
    /// No user matches the lookup key.
    #[error("user not found")]
    UserNotFound,
    /// No application is registered under the id.
    #[error("app not found")]
    AppNotFound,
    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for user records, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user and return its assigned id.
    ///
    /// # Errors
    /// Returns `StorageError::UserExists` if the email is already taken.
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<UserId, StorageError>;

    /// Look up a user by email.
    ///
    /// # Errors
    /// Returns `StorageError::UserNotFound` if no user has this email.
    async fn user(&self, email: &str) -> Result<User, StorageError>;

    /// Report whether the user holds the admin privilege.
    ///
    /// # Errors
    /// Returns `StorageError::UserNotFound` if the id is unknown.
    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError>;
}

/// Resolves tenant ids to their signing configuration.
#[async_trait]
pub trait AppStore: Send + Sync {
    /// Look up an application by id.
    ///
    /// # Errors
    /// Returns `StorageError::AppNotFound` if the id is unknown.
    async fn app(&self, app_id: AppId) -> Result<App, StorageError>;
}
