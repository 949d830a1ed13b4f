// src/llm/http_client.rs
// Shared HTTP execution and error classification for LLM providers

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::ProviderError;

/// Default request timeout when creating from an existing client
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Longest slice of an error body carried into a `ProviderError`
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Markers Gemini uses for a bad key on an otherwise plain 400
const AUTH_BODY_MARKERS: &[&str] = &["API_KEY_INVALID", "API key not valid", "API key expired"];

/// HTTP executor for provider calls.
///
/// Performs exactly one attempt per call and maps every failure onto
/// `ProviderError`. Retrying is left to `RetryPolicy`.
pub struct LlmHttpClient {
    client: Client,
    /// Applied per request, on top of the shared client's own timeouts
    pub request_timeout: Duration,
}

impl LlmHttpClient {
    /// Create from an existing reqwest::Client
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Execute one HTTP request built by `build_request`.
    ///
    /// The per-request timeout is applied on top of whatever the underlying
    /// client carries. Returns the response body as text on 2xx.
    pub async fn execute<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String, ProviderError>
    where
        F: FnOnce(&Client, String) -> reqwest::RequestBuilder,
    {
        let response = build_request(&self.client, body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            debug!(
                request_id = %request_id,
                status = %status,
                "Provider returned error status"
            );
            return Err(classify_status(status, &error_body));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("failed to read response body: {}", e)))
    }
}

/// Map a transport-level reqwest failure onto the provider taxonomy
pub fn classify_transport_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Unavailable(format!("request timed out: {}", err))
    } else if err.is_connect() {
        ProviderError::Unavailable(format!("connection failed: {}", err))
    } else if err.is_decode() || err.is_body() {
        ProviderError::MalformedResponse(err.to_string())
    } else {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Map a non-success HTTP status (plus its body) onto the provider taxonomy
pub fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let message = format!("{}: {}", status, truncate(body.trim(), MAX_ERROR_BODY_CHARS));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT => ProviderError::Unavailable(message),
        s if s.is_server_error() => ProviderError::Unavailable(message),
        _ if AUTH_BODY_MARKERS.iter().any(|m| body.contains(m)) => ProviderError::Auth(message),
        s => ProviderError::Rejected {
            status: s.as_u16(),
            message,
        },
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
