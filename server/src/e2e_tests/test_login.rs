//! Test login and token issuance through the gateway.

use crate::auth::verify_token;
use crate::e2e_tests::helpers::*;
use crate::proto::google::rpc::Code;
use crate::testing::test_app;

#[test]
fn test_login_issues_token_for_app() {
    let test = TestClient::new();
    let user_id = test.register_ok("a@x.com", "secret123");

    let token = test.login_ok("a@x.com", "secret123", 1);
    let claims = verify_token(&token, &test_app(1).signing).expect("token verifies");

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.app_id, 1);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_token_scoped_to_app() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");

    let token = test.login_ok("a@x.com", "secret123", 2);
    assert!(verify_token(&token, &test_app(2).signing).is_ok());
    assert!(verify_token(&token, &test_app(1).signing).is_err());
}

#[test]
fn test_wrong_password_and_unknown_email_look_the_same() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");

    let wrong_password = test.send(login_msg(1, "a@x.com", "wrong", 1));
    let unknown_email = test.send(login_msg(2, "nobody@x.com", "secret123", 1));

    assert_eq!(status_code(&wrong_password), Code::Unauthenticated);
    assert_eq!(status_code(&unknown_email), Code::Unauthenticated);
    assert_eq!(
        status_message(&wrong_password),
        status_message(&unknown_email)
    );
    assert!(wrong_password.payload.is_none());
    assert!(unknown_email.payload.is_none());
}

#[test]
fn test_login_unknown_app() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");

    let resp = test.send(login_msg(1, "a@x.com", "secret123", 42));
    assert_eq!(status_code(&resp), Code::NotFound);
    assert_eq!(status_message(&resp), "app not found");
}

#[test]
fn test_bad_credentials_reported_before_unknown_app() {
    let test = TestClient::new();
    test.register_ok("a@x.com", "secret123");

    let resp = test.send(login_msg(1, "a@x.com", "wrong", 42));
    assert_eq!(status_code(&resp), Code::Unauthenticated);
}
