use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Errors that reject a webhook request.
///
/// Anything that goes wrong after the request was decoded is logged instead, and the caller
/// still gets a success response.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("failed to decode request body: {0}")]
    BodyDecodingError(#[from] base64::DecodeError),
    #[error("failed to parse content type: {0}")]
    ContentTypeError(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match self {
            WebhookError::BodyDecodingError(_) => StatusCode::BAD_REQUEST,
            WebhookError::ContentTypeError(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        };

        (
            status,
            Json(WebhookResponse {
                error: Some(self.to_string()),
            }),
        )
            .into_response()
    }
}
