// src/llm/gemini/client.rs
// Google Gemini API client (single-turn, non-streaming)
// Authenticates via query-string key, not a Bearer header

use crate::http::create_shared_client;
use crate::llm::gemini::extraction::extract_reply;
use crate::llm::gemini::types::{GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig};
use crate::llm::http_client::LlmHttpClient;
use crate::llm::provider::{LlmClient, Provider};
use crate::llm::{ProviderError, logging};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Low temperature keeps department picks stable across identical requests
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: LlmHttpClient,
    temperature: f32,
    max_output_tokens: u32,
    /// Ask Gemini for `application/json` output instead of prose
    json_output: bool,
}

impl GeminiClient {
    /// Create a new Gemini client with default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Create a new Gemini client with custom model
    pub fn with_model(api_key: String, model: String) -> Self {
        Self::with_http_client(api_key, model, create_shared_client())
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            http: LlmHttpClient::from_client(client),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            json_output: false,
        }
    }

    /// Point the client at a different API base (proxies, tests)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    /// Per-call timeout for the generateContent request
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.http.request_timeout = timeout;
        self
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user_text(prompt)],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                response_mime_type: self.json_output.then(|| "application/json".to_string()),
            },
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider_type(&self) -> Provider {
        Provider::Gemini
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }

    #[instrument(skip(self, prompt), fields(request_id, model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            model = %self.model,
            json_output = self.json_output,
            "Starting Gemini request"
        );

        let body = serde_json::to_string(&self.build_request(prompt))
            .map_err(|e| ProviderError::Rejected {
                status: 0,
                message: format!("failed to encode request: {}", e),
            })?;

        let url = self.endpoint();
        let response_body = self
            .http
            .execute(&request_id, body, |client, body| {
                client
                    .post(&url)
                    .query(&[("key", self.api_key.as_str())])
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        debug!(request_id = %request_id, body_len = response_body.len(), "Gemini response received");

        let data: GeminiResponse = serde_json::from_str(&response_body).map_err(|e| {
            ProviderError::MalformedResponse(format!("failed to parse Gemini response: {}", e))
        })?;

        if let Some(ref usage) = data.usage_metadata {
            logging::log_usage(&request_id, "Gemini", usage);
        }

        let reply = extract_reply(&data)?;

        logging::log_completion(&request_id, "Gemini", duration_ms, reply.len());

        Ok(reply)
    }
}
