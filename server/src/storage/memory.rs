//! In-memory user and application store.
//!
//! Backs both `UserStore` and `AppStore` with maps held in process memory.
//! Applications and admin emails are fixed at construction; users are added
//! through `save_user`.
//!
//! # Thread Safety
//!
//! The user table sits behind a single `RwLock`. `save_user` checks for an
//! existing email and inserts under the same write guard, so two concurrent
//! registrations of one email cannot both succeed.
//!
//! # Invariants
//!
//! - Every id in `by_email` has a matching entry in `by_id`, and vice versa.
//! - Ids are assigned sequentially starting at 1 and never reused.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{AppStore, StorageError, User, UserStore};
use crate::auth::App;
use crate::types::{AppId, UserId};

#[derive(Default)]
struct UserTable {
    last_id: i64,
    by_email: HashMap<String, UserId>,
    by_id: HashMap<UserId, User>,
}

pub struct MemoryStorage {
    users: RwLock<UserTable>,
    apps: HashMap<AppId, App>,
    admin_emails: HashSet<String>,
}

impl MemoryStorage {
    /// Create a store serving the given applications.
    ///
    /// Users registered with an email in `admin_emails` report as admins.
    #[must_use]
    pub fn new(
        apps: impl IntoIterator<Item = App>,
        admin_emails: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            users: RwLock::new(UserTable::default()),
            apps: apps.into_iter().map(|app| (app.id, app)).collect(),
            admin_emails: admin_emails.into_iter().collect(),
        }
    }

    /// Number of registered users.
    pub fn user_count(&self) -> Result<usize, StorageError> {
        let users = self.users.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(users.by_id.len())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(Vec::<App>::new(), Vec::<String>::new())
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<UserId, StorageError> {
        let mut users = self.users.write().map_err(|_| StorageError::LockPoisoned)?;

        if users.by_email.contains_key(email) {
            return Err(StorageError::UserExists);
        }

        users.last_id += 1;
        let id = UserId(users.last_id);
        users.by_email.insert(email.to_string(), id);
        users.by_id.insert(
            id,
            User {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_vec(),
            },
        );
        drop(users);

        Ok(id)
    }

    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let users = self.users.read().map_err(|_| StorageError::LockPoisoned)?;
        users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned()
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError> {
        let users = self.users.read().map_err(|_| StorageError::LockPoisoned)?;
        let user = users.by_id.get(&user_id).ok_or(StorageError::UserNotFound)?;
        Ok(self.admin_emails.contains(&user.email))
    }
}

#[async_trait]
impl AppStore for MemoryStorage {
    async fn app(&self, app_id: AppId) -> Result<App, StorageError> {
        self.apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::AppNotFound)
    }
}
