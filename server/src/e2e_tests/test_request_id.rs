//! Test that request IDs are correctly echoed in responses.

use crate::e2e_tests::helpers::*;
use crate::proto::google::rpc::Code;

#[test]
fn test_request_id_preserved() {
    let test = TestClient::new();

    for request_id in [1, 100, 999, u32::MAX] {
        let resp = test.send(is_admin_msg(request_id, 7));
        assert_eq!(resp.request_id, Some(request_id));
    }
}

#[test]
fn test_request_id_preserved_on_error() {
    let test = TestClient::new();

    let resp = test.send(login_msg(41, "nobody@x.com", "secret123", 1));
    assert_eq!(status_code(&resp), Code::Unauthenticated);
    assert_eq!(resp.request_id, Some(41));

    let resp = test.send(login_msg(42, "", "secret123", 1));
    assert_eq!(status_code(&resp), Code::InvalidArgument);
    assert_eq!(resp.request_id, Some(42));
}

#[test]
fn test_request_id_none() {
    let test = TestClient::new();

    let mut message = is_admin_msg(1, 1);
    message.request_id = None;

    let resp = test.send(message);
    assert_eq!(resp.request_id, None);
}
