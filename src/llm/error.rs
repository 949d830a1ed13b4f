// src/llm/error.rs
// Provider failure taxonomy shared by every LLM client

use thiserror::Error;

/// Failure modes of a single provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network failure, connect/read timeout, or a 5xx from the provider
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Invalid or missing credentials
    #[error("provider rejected credentials: {0}")]
    Auth(String),

    #[error("provider rate limit exceeded: {0}")]
    RateLimited(String),

    /// Reply arrived but carried no usable text
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status (bad model name, invalid argument, ...)
    #[error("provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ProviderError {
    /// Transient failures are worth one more attempt after a backoff
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::RateLimited(_))
    }

    /// Stable machine-readable code, surfaced in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "PROVIDER_UNAVAILABLE",
            Self::Auth(_) => "PROVIDER_AUTH_ERROR",
            Self::RateLimited(_) => "PROVIDER_RATE_LIMITED",
            Self::MalformedResponse(_) => "PROVIDER_MALFORMED_RESPONSE",
            Self::Rejected { .. } => "PROVIDER_REJECTED",
        }
    }
}
