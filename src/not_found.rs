use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::envelope::Envelope;

/// The fallback for requests that match no route or use an unsupported method.
pub async fn get_404_not_found() -> Response {
    Envelope::failure(StatusCode::NOT_FOUND, "Route not found").into_response()
}
