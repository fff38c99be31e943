use axum::http::StatusCode;
use axum_test::TestResponse;
use serde_json::Value;

/// Check that `response` is a successful envelope and return its body.
#[track_caller]
pub(crate) fn assert_success(response: &TestResponse) -> Value {
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true, "got body {body}");
    body
}

/// Check that `response` is a failed envelope with `status` and `message`.
#[track_caller]
pub(crate) fn assert_failure(response: &TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["success"], false, "got body {body}");
    assert_eq!(body["message"], message, "got body {body}");
}
