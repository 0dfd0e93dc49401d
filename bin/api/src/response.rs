//! The uniform JSON envelope.
//!
//! Logical failures are encoded in the body with HTTP 200 so clients handle
//! every outcome through one code path; only transport-level failures
//! (malformed JSON, unknown routes) surface as non-200 responses.

use animetoken_core::ApiError;
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

pub fn json_ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}

pub fn json_err<T: Serialize>(err: ApiError) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: false,
        data: None,
        error: Some(ErrorBody {
            code: err.code(),
            message: err.to_string(),
        }),
    })
}

/// Fold a handler result into the envelope.
pub fn respond<T: Serialize>(result: Result<T, ApiError>) -> Json<ApiResponse<T>> {
    match result {
        Ok(data) => json_ok(data),
        Err(err) => {
            if matches!(err, ApiError::Internal(_)) {
                tracing::error!(error = %err, "request failed");
            }
            json_err(err)
        }
    }
}
