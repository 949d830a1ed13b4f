// src/error.rs
// Error taxonomy for one triage recommendation

use std::time::Duration;
use thiserror::Error;

use crate::llm::ProviderError;
use crate::triage::{UnparsableResponse, ValidationError};

/// Everything that can stop a recommendation from being produced
#[derive(Error, Debug)]
pub enum TriageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("unparsable model reply: {0}")]
    Unparsable(#[from] UnparsableResponse),

    #[error("recommendation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Convenience type alias for Result using TriageError
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Stable machine-readable code for the API body
    pub fn code(&self) -> &'static str {
        match self {
            TriageError::Validation(_) => "VALIDATION_ERROR",
            TriageError::Provider(e) => e.code(),
            TriageError::Unparsable(_) => "UNPARSABLE_RESPONSE",
            TriageError::Timeout(_) => "TIMEOUT",
        }
    }

    /// Pipeline stage that failed, for logs
    pub fn stage(&self) -> &'static str {
        match self {
            TriageError::Validation(_) => "validation",
            TriageError::Provider(_) | TriageError::Timeout(_) => "provider",
            TriageError::Unparsable(_) => "parse",
        }
    }

    /// Whether the caller supplied bad input (as opposed to an upstream failure)
    pub fn is_client_error(&self) -> bool {
        matches!(self, TriageError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Display
    // ============================================================================

    #[test]
    fn test_validation_error_is_transparent() {
        let err: TriageError = ValidationError::single("age", "is required").into();
        assert_eq!(err.to_string(), "invalid triage request: age: is required");
    }

    #[test]
    fn test_provider_error_display() {
        let err: TriageError = ProviderError::Unavailable("connection refused".into()).into();
        assert!(err.to_string().contains("provider error"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_timeout_display() {
        let err = TriageError::Timeout(Duration::from_secs(75));
        assert!(err.to_string().contains("75s"));
    }

    // ============================================================================
    // Codes and stages
    // ============================================================================

    #[test]
    fn test_codes() {
        let validation: TriageError = ValidationError::single("gender", "is required").into();
        assert_eq!(validation.code(), "VALIDATION_ERROR");

        let auth: TriageError = ProviderError::Auth("bad key".into()).into();
        assert_eq!(auth.code(), "PROVIDER_AUTH_ERROR");

        let unparsable: TriageError = UnparsableResponse::new("reply is empty").into();
        assert_eq!(unparsable.code(), "UNPARSABLE_RESPONSE");

        assert_eq!(TriageError::Timeout(Duration::from_secs(1)).code(), "TIMEOUT");
    }

    #[test]
    fn test_stages() {
        let validation: TriageError = ValidationError::single("age", "is required").into();
        assert_eq!(validation.stage(), "validation");
        assert!(validation.is_client_error());

        let timeout = TriageError::Timeout(Duration::from_secs(1));
        assert_eq!(timeout.stage(), "provider");
        assert!(!timeout.is_client_error());
    }
}
