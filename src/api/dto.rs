use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Error body returned by every handler
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field problems of a rejected form
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,
}

#[derive(Debug, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            details: None,
            fields: Vec::new(),
        }),
    )
}

/// 500 with a generic message; the cause is logged, not returned
pub fn internal_error(code: &str, cause: &dyn std::fmt::Display) -> ApiError {
    tracing::error!(code, "Request failed: {}", cause);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, code, "Internal server error")
}

/// Convert timestamp to ISO 8601 string
pub fn timestamp_to_rfc3339(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "1970-01-01T00:00:00+00:00".to_string())
}
