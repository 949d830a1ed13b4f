// src/triage/service.rs
// Request orchestration: validate -> build prompt -> call LLM -> parse

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

use super::parser::parse_reply;
use super::prompt::{ResponseFormat, build_prompt};
use super::types::{TriageRequest, TriageResponse};
use super::validation::{ValidationMode, validate};
use crate::error::{Result, TriageError};
use crate::llm::{LlmClient, RetryPolicy};

/// Default deadline for one recommendation, retry included
const DEFAULT_DEADLINE_SECS: u64 = 75;
/// How much of an unparsable reply goes into the warning log
const REPLY_LOG_CHARS: usize = 200;

/// Knobs for `TriageService`
#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    pub response_format: ResponseFormat,
    pub validation_mode: ValidationMode,
    pub retry: RetryPolicy,
    /// Upper bound on the provider call including retry and backoff
    pub deadline: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            response_format: ResponseFormat::default(),
            validation_mode: ValidationMode::default(),
            retry: RetryPolicy::default(),
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
        }
    }
}

/// Stateless triage pipeline, shared across concurrent requests
pub struct TriageService {
    client: Arc<dyn LlmClient>,
    options: ServiceOptions,
}

impl TriageService {
    pub fn new(client: Arc<dyn LlmClient>, options: ServiceOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &Arc<dyn LlmClient> {
        &self.client
    }

    /// Full pipeline from an untyped JSON body.
    ///
    /// Validation failures return before the provider is touched.
    pub async fn recommend(&self, body: &Value) -> Result<TriageResponse> {
        let request = validate(body, self.options.validation_mode).inspect_err(|e| {
            debug!(fields = e.fields.len(), "Triage request rejected by validation");
        })?;
        self.recommend_validated(&request).await
    }

    /// Pipeline for an already validated request
    #[instrument(skip_all, fields(request_id, symptom_count = request.symptoms().len()))]
    pub async fn recommend_validated(&self, request: &TriageRequest) -> Result<TriageResponse> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        let prompt = build_prompt(request, self.options.response_format);
        debug!(request_id = %request_id, prompt_len = prompt.as_str().len(), "Prompt built");

        let client = &self.client;
        let prompt_text = prompt.as_str();
        let call = self
            .options
            .retry
            .run(&request_id, move |_attempt| client.complete(prompt_text));

        let reply = tokio::time::timeout(self.options.deadline, call)
            .await
            .map_err(|_| {
                warn!(
                    request_id = %request_id,
                    deadline_ms = self.options.deadline.as_millis() as u64,
                    "Provider call exceeded deadline, abandoning"
                );
                TriageError::Timeout(self.options.deadline)
            })?
            .inspect_err(|e| {
                warn!(request_id = %request_id, error = %e, "Provider call failed");
            })?;

        let response = parse_reply(&reply).inspect_err(|e| {
            warn!(
                request_id = %request_id,
                reason = %e.reason,
                reply = %truncate(&reply, REPLY_LOG_CHARS),
                "Could not parse model reply"
            );
        })?;

        info!(
            request_id = %request_id,
            department = %response.department,
            has_explanation = response.explanation.is_some(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Triage recommendation complete"
        );

        Ok(response)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
