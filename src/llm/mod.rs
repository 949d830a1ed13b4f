// src/llm/mod.rs
// LLM client adapter: provider trait, Gemini client, bounded retry

mod error;
mod gemini;
mod http_client;
mod logging;
mod provider;
mod retry;

pub use error::ProviderError;
pub use gemini::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_API_BASE, GeminiClient,
};
pub use http_client::{LlmHttpClient, classify_status, classify_transport_error};
pub use provider::{LlmClient, Provider};
pub use retry::{MAX_RETRIES_CAP, RetryPolicy};
