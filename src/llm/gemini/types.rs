// src/llm/gemini/types.rs
// Wire types for the Gemini generateContent API

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    /// Single text part authored by the user
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: Some(text.into()),
                thought: false,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Thinking models flag their thought summaries; those are not the answer
    #[serde(default, skip_serializing)]
    pub thought: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user_text("hello")],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 500,
                response_mime_type: None,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!(value["contents"][0]["parts"][0].get("thought").is_none());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 500);
        assert!(value["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_request_includes_mime_type_when_set() {
        let config = GenerationConfig {
            temperature: 0.3,
            max_output_tokens: 500,
            response_mime_type: Some("application/json".into()),
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], "application/json");
    }

    #[test]
    fn test_response_deserializes() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Department: Neurology"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 412, "candidatesTokenCount": 5, "totalTokenCount": 417}
        });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.candidates.len(), 1);
        let candidate = &response.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let parts = &candidate.content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Department: Neurology"));
        assert!(!parts[0].thought);
        assert_eq!(response.usage_metadata.unwrap().total_token_count, Some(417));
    }

    #[test]
    fn test_blocked_response_deserializes() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
