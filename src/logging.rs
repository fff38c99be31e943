//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::envelope::Envelope;

/// The number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED_FIELDS: [&str; 1] = ["password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in JSON request bodies are never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match read_body(body).await {
        Some(bytes) => bytes,
        None => {
            return Envelope::failure(StatusCode::BAD_REQUEST, "Could not read request body")
                .into_response();
        }
    };

    let display_text = redact_json_fields(&String::from_utf8_lossy(&body_bytes));
    log_request(&parts, &display_text);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body).await {
        Some(bytes) => bytes,
        None => {
            return Envelope::failure(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
                .into_response();
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body: {error}"))
        .ok()
}

/// Replace the value of any top-level password field in a JSON object.
///
/// Text that is not a JSON object is returned as is.
fn redact_json_fields(body_text: &str) -> String {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(body_text) else {
        return body_text.to_string();
    };

    let mut redacted = false;
    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = Value::String("********".to_owned());
            redacted = true;
        }
    }

    if redacted {
        Value::Object(object).to_string()
    } else {
        body_text.to_string()
    }
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, if it is longer.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if let Some(truncated) = truncate(body) {
        tracing::info!("Received request: {headers:#?}\nbody: {truncated}...");
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if let Some(truncated) = truncate(body) {
        tracing::info!("Sending response: {headers:#?}\nbody: {truncated}...");
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}
