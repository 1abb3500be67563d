//! Test that malformed requests are rejected with `INVALID_ARGUMENT`.

use crate::e2e_tests::helpers::*;
use crate::proto;
use crate::proto::google::rpc::Code;

fn assert_invalid(test: &TestClient, message: proto::ClientMessage, expected: &str) {
    let resp = test.send(message);
    assert_eq!(status_code(&resp), Code::InvalidArgument);
    assert_eq!(status_message(&resp), expected);
    assert!(resp.payload.is_none());
}

#[test]
fn test_missing_payload() {
    let test = TestClient::new();
    assert_invalid(
        &test,
        proto::ClientMessage {
            request_id: Some(1),
            payload: None,
        },
        "Client message must have a payload",
    );
}

#[test]
fn test_missing_request_id() {
    let test = TestClient::new();
    let mut message = register_msg(1, "a@x.com", "secret123");
    message.request_id = None;
    assert_invalid(&test, message, "Client message must have a request_id");
}

#[test]
fn test_login_missing_fields() {
    let test = TestClient::new();
    assert_invalid(&test, login_msg(1, "", "secret123", 1), "email is required");
    assert_invalid(
        &test,
        login_msg(2, "a@x.com", "", 1),
        "password is required",
    );
    assert_invalid(
        &test,
        login_msg(3, "a@x.com", "secret123", 0),
        "app_id is required",
    );
}

#[test]
fn test_register_missing_fields() {
    let test = TestClient::new();
    assert_invalid(&test, register_msg(1, "", "secret123"), "email is required");
    assert_invalid(
        &test,
        register_msg(2, "a@x.com", ""),
        "password is required",
    );
}

#[test]
fn test_is_admin_missing_user_id() {
    let test = TestClient::new();
    assert_invalid(&test, is_admin_msg(1, 0), "user_id is required");
}

#[test]
fn test_rejected_register_stores_nothing() {
    let test = TestClient::new();
    test.send(register_msg(1, "a@x.com", ""));

    #[allow(clippy::expect_used)]
    let storage = test.storage.as_ref().expect("default client has storage");
    assert_eq!(storage.user_count().expect("count"), 0);
}
