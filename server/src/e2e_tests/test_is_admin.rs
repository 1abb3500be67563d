//! Test the admin check through the gateway.

use crate::e2e_tests::helpers::*;
use crate::proto;
use crate::proto::google::rpc::Code;
use crate::testing::ADMIN_EMAIL;

fn is_admin(test: &TestClient, user_id: i64) -> bool {
    let resp = test.send(is_admin_msg(1, user_id));
    assert_eq!(status_code(&resp), Code::Ok, "is_admin failed: {resp:?}");
    match resp.payload {
        Some(proto::server_response::Payload::IsAdmin(r)) => r.is_admin,
        other => panic!("Expected IsAdminResponse, got {other:?}"),
    }
}

#[test]
fn test_regular_user_is_not_admin() {
    let test = TestClient::new();
    let user_id = test.register_ok("a@x.com", "secret123");

    assert!(!is_admin(&test, user_id));
}

#[test]
fn test_configured_admin() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");
    let admin_id = test.register_ok(ADMIN_EMAIL, "secret123");

    assert!(is_admin(&test, admin_id));
}

#[test]
fn test_is_admin_unknown_user() {
    let test = TestClient::new();

    let resp = test.send(is_admin_msg(1, 99));
    assert_eq!(status_code(&resp), Code::NotFound);
    assert_eq!(status_message(&resp), "user not found");
    assert!(resp.payload.is_none());
}
