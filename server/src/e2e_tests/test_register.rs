//! Test user registration through the gateway.

use crate::e2e_tests::helpers::*;
use crate::proto;
use crate::proto::google::rpc::Code;

#[test]
fn test_register_assigns_ids() {
    let test = TestClient::new();

    assert_eq!(test.register_ok("a@x.com", "secret123"), 1);
    assert_eq!(test.register_ok("b@x.com", "secret123"), 2);
}

#[test]
fn test_register_duplicate_email() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");

    let resp = test.send(register_msg(2, "a@x.com", "other-password"));
    assert_eq!(status_code(&resp), Code::AlreadyExists);
    assert_eq!(status_message(&resp), "user already exists");
    assert!(resp.payload.is_none());
}

#[test]
fn test_register_response_shape() {
    let test = TestClient::new();

    let resp = test.send(register_msg(5, "a@x.com", "secret123"));
    assert_eq!(resp.request_id, Some(5));
    assert_eq!(status_code(&resp), Code::Ok);
    assert!(matches!(
        resp.payload,
        Some(proto::server_response::Payload::Register(
            proto::RegisterResponse { user_id: 1 }
        ))
    ));
}

#[test]
fn test_register_does_not_store_plaintext() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");

    #[allow(clippy::expect_used)]
    let storage = test.storage.as_ref().expect("default client has storage");
    let user = test
        .runtime
        .block_on(async {
            use crate::storage::UserStore;
            storage.user("a@x.com").await
        })
        .expect("user stored");

    let stored = String::from_utf8_lossy(&user.password_hash);
    assert!(!stored.contains("secret123"));
    assert!(stored.starts_with("$argon2id$"));
}
