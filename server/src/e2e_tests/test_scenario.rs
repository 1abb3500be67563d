//! Full register, login and admin-check flow on a fresh store.

use crate::auth::verify_token;
use crate::e2e_tests::helpers::*;
use crate::proto::google::rpc::Code;
use crate::testing::test_app;

#[test]
fn test_register_login_is_admin_flow() {
    let test = TestClient::new();

    let user_id = test.register_ok("a@x.com", "secret123");
    assert_eq!(user_id, 1);

    let token = test.login_ok("a@x.com", "secret123", 1);
    let claims = verify_token(&token, &test_app(1).signing).expect("token verifies");
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.app_id, 1);

    let resp = test.send(login_msg(3, "a@x.com", "wrong", 1));
    assert_eq!(status_code(&resp), Code::Unauthenticated);
    assert_eq!(resp.request_id, Some(3));

    let resp = test.send(is_admin_msg(4, 1));
    assert_eq!(status_code(&resp), Code::Ok);
    assert!(matches!(
        resp.payload,
        Some(crate::proto::server_response::Payload::IsAdmin(r)) if !r.is_admin
    ));
}
