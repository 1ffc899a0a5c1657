//! API error body and status mapping

use crate::error::ServiceError;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// API error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
}

pub type ApiFailure = (StatusCode, Json<ApiError>);

pub fn validation(message: impl Into<String>) -> ApiFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(error_codes::VALIDATION_ERROR, message)),
    )
}

/// Map a service failure onto a status code and error body
pub fn from_service(e: ServiceError) -> ApiFailure {
    let (status, code) = match &e {
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
        ServiceError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, error_codes::TIMEOUT),
        ServiceError::Upstream { .. }
        | ServiceError::RequestFailed(_)
        | ServiceError::InvalidResponse(_) => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
        ServiceError::Unsupported(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
    };

    let mut body = ApiError::new(code, e.to_string());
    if let ServiceError::Upstream { status, .. } = &e {
        body = body.with_details(serde_json::json!({ "upstream_status": status }));
    }
    (status, Json(body))
}
