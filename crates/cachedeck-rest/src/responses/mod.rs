//! Response envelopes for the cache API.
//!
//! Successful reads answer `{"success": true, "data": ...}`; failures
//! answer `{"success": false, "error": {"code", "message"}}` with the
//! status derived from the error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cachedeck_core::{CacheDeckError, ErrorResponse};
use serde::Serialize;
use tracing::{error, warn};

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps `data`.
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorResponse,
}

/// Handler error carrying a [`CacheDeckError`].
#[derive(Debug)]
pub struct AppError(pub CacheDeckError);

impl From<CacheDeckError> for AppError {
    fn from(err: CacheDeckError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Store failures are ours; everything else is the caller's
        if status.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        } else {
            warn!(code = self.0.error_code(), "Request rejected: {}", self.0);
        }

        let body = ErrorEnvelope {
            success: false,
            error: ErrorResponse::from_error(&self.0),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers answering with a JSON envelope.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Wraps `data` in a success envelope.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Empty 204 response.
#[must_use]
pub const fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Success envelope when `data` is present, empty 204 otherwise.
pub fn ok_or_no_content<T: Serialize>(data: Option<T>) -> Result<Response, AppError> {
    Ok(match data {
        Some(data) => Json(ApiResponse::success(data)).into_response(),
        None => no_content().into_response(),
    })
}
