use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::RelayError;

/// JSON error body: `{"error": "...", "details": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A [`RelayError`] on its way out of an HTTP handler.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Protocol(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Only error codes are passed through; anything else would read as success
            // or redirect to the caller.
            RelayError::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.to_string(),
            details: self.0.hint().map(String::from),
        };
        (status, Json(body)).into_response()
    }
}
