//! Shared fixtures for unit and end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{App, AuthService, HashParams, PasswordHasher, SigningKey};
use crate::storage::{AppStore, MemoryStorage, UserStore};
use crate::types::AppId;

/// Email that the test store treats as an admin.
pub const ADMIN_EMAIL: &str = "admin@x.com";

/// Token lifetime used by test services.
pub const TEST_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Smallest Argon2 work factor, so tests do not spend seconds hashing.
pub const fn fast_hash_params() -> HashParams {
    HashParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

/// Test application `id` with a secret unique to that id.
pub fn test_app(id: i32) -> App {
    #[allow(clippy::expect_used)]
    let signing = SigningKey::new_hs256(format!("test-secret-for-app-{id}").into_bytes())
        .expect("non-empty secret");
    App {
        id: AppId(id),
        name: format!("test-app-{id}"),
        signing,
    }
}

/// A store serving apps 1 and 2, with `ADMIN_EMAIL` as the only admin.
pub fn new_test_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new(
        [test_app(1), test_app(2)],
        [ADMIN_EMAIL.to_string()],
    ))
}

/// A service over a fresh `new_test_storage`, returned alongside the store.
pub fn new_test_service() -> (AuthService, Arc<MemoryStorage>) {
    let storage = new_test_storage();
    #[allow(clippy::expect_used)]
    let hasher = PasswordHasher::new(fast_hash_params()).expect("valid hash params");
    let service = AuthService::new(
        Arc::clone(&storage) as Arc<dyn UserStore>,
        Arc::clone(&storage) as Arc<dyn AppStore>,
        hasher,
        TEST_TOKEN_TTL,
    );
    (service, storage)
}
