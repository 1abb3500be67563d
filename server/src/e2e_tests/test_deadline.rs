//! Test that a request stuck in the store is cut off at the deadline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{App, AuthService, PasswordHasher};
use crate::e2e_tests::helpers::*;
use crate::proto::google::rpc::Code;
use crate::storage::{AppStore, StorageError, User, UserStore};
use crate::testing::{TEST_TOKEN_TTL, fast_hash_params};
use crate::types::{AppId, UserId};

/// A store whose calls never complete.
struct StuckStore;

#[async_trait]
impl UserStore for StuckStore {
    async fn save_user(&self, _email: &str, _hash: &[u8]) -> Result<UserId, StorageError> {
        std::future::pending().await
    }

    async fn user(&self, _email: &str) -> Result<User, StorageError> {
        std::future::pending().await
    }

    async fn is_admin(&self, _user_id: UserId) -> Result<bool, StorageError> {
        std::future::pending().await
    }
}

#[async_trait]
impl AppStore for StuckStore {
    async fn app(&self, _app_id: AppId) -> Result<App, StorageError> {
        std::future::pending().await
    }
}

fn stuck_client() -> TestClient {
    let store = Arc::new(StuckStore);
    let service = AuthService::new(
        Arc::clone(&store) as Arc<dyn UserStore>,
        store as Arc<dyn AppStore>,
        PasswordHasher::new(fast_hash_params()).expect("valid hash params"),
        TEST_TOKEN_TTL,
    );
    TestClient::with_service(service, Duration::from_millis(50))
}

#[test]
fn test_stuck_login_exceeds_deadline() {
    let test = stuck_client();

    let resp = test.send(login_msg(9, "a@x.com", "secret123", 1));
    assert_eq!(status_code(&resp), Code::DeadlineExceeded);
    assert_eq!(resp.request_id, Some(9));
    assert!(resp.payload.is_none());
}

#[test]
fn test_stuck_register_exceeds_deadline() {
    let test = stuck_client();

    let resp = test.send(register_msg(1, "a@x.com", "secret123"));
    assert_eq!(status_code(&resp), Code::DeadlineExceeded);
}

#[test]
fn test_stuck_is_admin_exceeds_deadline() {
    let test = stuck_client();

    let resp = test.send(is_admin_msg(1, 1));
    assert_eq!(status_code(&resp), Code::DeadlineExceeded);
}
