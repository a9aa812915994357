//! Structured errors for the proxy endpoints.
//!
//! This is the only place user-visible structured errors appear: every
//! variant maps to an HTTP status and a JSON body with an `error` field
//! (plus `detail` for upstream failures).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Structured errors for the proxy endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Required query parameter is missing (400).
    #[error("{0}")]
    MissingParkCode(&'static str),

    /// Server-side NPS API key is not configured (500).
    #[error("NPS_API_KEY not configured")]
    MissingApiKey,

    /// Unknown park code (404).
    #[error("Park not found: {0}")]
    ParkNotFound(String),

    /// NPS API unreachable or returned an error (502).
    #[error("Failed to fetch from NPS API: {detail}")]
    Upstream { detail: String },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::MissingParkCode(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ProxyError::MissingApiKey => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "NPS_API_KEY not configured" }))
            }
            ProxyError::ParkNotFound(code) => {
                (StatusCode::NOT_FOUND, json!({ "error": format!("Park not found: {}", code) }))
            }
            ProxyError::Upstream { detail } => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "Failed to fetch from NPS API", "detail": detail }),
            ),
        };

        tracing::error!(status = status.as_u16(), error = %self, "proxy request failed");

        (status, Json(body)).into_response()
    }
}
