// src/web/error.rs
// HTTP mapping for triage failures

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::error::TriageError;
use crate::llm::ProviderError;
use crate::triage::FieldError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: &'static str,
    /// Field-level detail for validation failures
    pub fields: Vec<FieldError>,
}

impl ApiError {
    fn new(status_code: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            error_code,
            fields: Vec::new(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message,
            "code": self.error_code,
        });

        if !self.fields.is_empty() {
            body["fields"] = json!(self.fields);
        }

        (self.status_code, Json(body)).into_response()
    }
}

/// Status for each failure kind
fn status_for(err: &TriageError) -> StatusCode {
    match err {
        TriageError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TriageError::Provider(ProviderError::Unavailable(_))
        | TriageError::Provider(ProviderError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
        TriageError::Provider(_) | TriageError::Unparsable(_) => StatusCode::BAD_GATEWAY,
        TriageError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        let status_code = status_for(&err);
        let error_code = err.code();

        if !err.is_client_error() {
            // Provider detail stays in the logs; callers get a stable message
            error!(stage = err.stage(), code = error_code, error = %err, "Recommendation failed");
        }

        match err {
            TriageError::Validation(validation) => Self {
                message: validation.to_string(),
                status_code,
                error_code,
                fields: validation.fields,
            },
            TriageError::Provider(ProviderError::Auth(_)) => Self::new(
                status_code,
                error_code,
                "The recommendation provider rejected the service credentials",
            ),
            TriageError::Provider(ref e) if e.is_transient() => Self::new(
                status_code,
                error_code,
                "The recommendation provider is temporarily unavailable",
            ),
            TriageError::Provider(_) => Self::new(
                status_code,
                error_code,
                "The recommendation provider returned an unusable response",
            ),
            TriageError::Unparsable(_) => Self::new(
                status_code,
                error_code,
                "Could not determine a department from the provider's reply",
            ),
            TriageError::Timeout(_) => Self::new(
                status_code,
                error_code,
                "The recommendation took too long",
            ),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = rejection.status().as_u16(), "Rejected request body: {}", rejection.body_text());
        Self::new(rejection.status(), "INVALID_BODY", rejection.body_text())
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
