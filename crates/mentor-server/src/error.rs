//! Mapping of relay errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mentor_core::Error;
use tracing::{error, warn};

/// Handler error rendered as `{"detail": ...}` with a status matching the failure.
#[derive(Debug)]
pub enum ApiError {
    /// Failure inside the relay or from the provider.
    Relay(Error),
    /// Request body the JSON extractor refused.
    Body(JsonRejection),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Relay(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::Relay(Error::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Relay(Error::Provider { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Relay(
                Error::Config(_) | Error::Http(_) | Error::Json(_) | Error::Internal(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Relay(e) => e.to_string(),
            Self::Body(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("Chat error: {}", detail);
        } else if let Self::Body(_) = self {
            warn!("Rejected chat request: {}", detail);
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
