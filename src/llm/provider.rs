// src/llm/provider.rs
// LLM provider abstraction layer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ProviderError;

/// LLM provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Provider {
    Gemini,
}

impl Provider {
    /// Environment variables holding this provider's API key, in lookup order
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Trait for LLM clients - one prompt in, one text reply out.
///
/// Implementations make exactly one provider call per `complete` and never
/// retry on their own; retrying is the caller's decision (see `RetryPolicy`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single-turn prompt and return the raw text reply
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Get the provider type
    fn provider_type(&self) -> Provider;

    /// Model identifier used for requests
    fn model_name(&self) -> String;
}
