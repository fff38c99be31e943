//! The JSON wrapper used for every response: `{success, message?, ...payload}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A response body with a success flag, an optional message and a payload
/// whose fields are merged into the top level object.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human readable description of the outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation specific fields.
    #[serde(flatten)]
    pub payload: T,
    #[serde(skip)]
    status: StatusCode,
}

/// A payload with no fields.
#[derive(Debug, Default, Serialize)]
pub struct NoPayload {}

impl<T: Serialize> Envelope<T> {
    /// A successful (200 OK) response carrying `payload`.
    pub fn success(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload,
            status: StatusCode::OK,
        }
    }

    /// Attach a message to the response.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<NoPayload> {
    /// A successful response with only a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Envelope::success(NoPayload {}).with_message(message)
    }

    /// A failed response with `status` and `message`.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payload: NoPayload {},
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
