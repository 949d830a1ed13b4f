// src/llm/logging.rs
// Shared LLM logging helpers

use super::gemini::types::UsageMetadata;
use tracing::info;

/// Log usage statistics for an LLM call.
pub fn log_usage(request_id: &str, provider: &str, usage: &UsageMetadata) {
    info!(
        request_id = %request_id,
        prompt_tokens = usage.prompt_token_count.unwrap_or(0),
        completion_tokens = usage.candidates_token_count.unwrap_or(0),
        total_tokens = usage.total_token_count.unwrap_or(0),
        "{} usage stats", provider
    );
}

/// Log completion summary for an LLM call.
pub fn log_completion(request_id: &str, provider: &str, duration_ms: u64, content_len: usize) {
    info!(
        request_id = %request_id,
        duration_ms = duration_ms,
        content_len = content_len,
        "{} request complete", provider
    );
}
