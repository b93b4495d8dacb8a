//! API error responses.
//!
//! The contact endpoint distinguishes three failure classes: schema
//! validation (field-level detail, 400), quota exhaustion (429) and send
//! failure (500). Validation and rate-limit failures are produced before
//! any side effect; send failures carry the transport message under a
//! fixed prefix.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Prefix of the error message attached to send failures.
pub const SEND_FAILED_PREFIX: &str = "Error al enviar correo: ";

/// Error returned across the API boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Schema validation failed. The body is the field→messages map.
    Validation(HashMap<String, Vec<String>>),
    /// The request body could not be parsed at all.
    Malformed(String),
    /// The identity exceeded its quota.
    RateLimited,
    /// A notification email could not be sent.
    SendFailed(String),
    /// The forwarded admin application is unreachable.
    Upstream(String),
}

impl ApiError {
    /// Create a send-failure error carrying the transport detail.
    pub fn send_failed(detail: impl Into<String>) -> Self {
        Self::SendFailed(detail.into())
    }

    /// Create a validation error from validator errors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self::Validation(details)
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::SendFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(fields) => Json(json!(fields)),
            ApiError::Malformed(detail) => Json(json!({ "detail": detail })),
            ApiError::RateLimited => Json(json!({
                "error": "Demasiadas peticiones. Intente de nuevo más tarde."
            })),
            ApiError::SendFailed(detail) => {
                Json(json!({ "error": format!("{SEND_FAILED_PREFIX}{detail}") }))
            }
            ApiError::Upstream(detail) => {
                tracing::error!(error = %detail, "admin upstream request failed");
                Json(json!({ "error": "La aplicación de administración no está disponible." }))
            }
        };
        (status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(fields) => write!(f, "validation failed: {fields:?}"),
            ApiError::Malformed(detail) => write!(f, "malformed request: {detail}"),
            ApiError::RateLimited => write!(f, "rate limited"),
            ApiError::SendFailed(detail) => write!(f, "{SEND_FAILED_PREFIX}{detail}"),
            ApiError::Upstream(detail) => write!(f, "upstream error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}
