// src/llm/gemini/extraction.rs
// Response extraction helpers for Gemini API responses

use crate::llm::ProviderError;
use crate::llm::gemini::types::{GeminiContent, GeminiResponse};

/// Extract text content from Gemini response (non-thought parts only)
pub fn extract_content(content: &GeminiContent) -> Option<String> {
    let text_parts: Vec<&str> = content
        .parts
        .iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text_parts.is_empty() {
        None
    } else {
        Some(text_parts.join(""))
    }
}

/// Pull the reply text out of the first candidate.
///
/// A blocked prompt, a missing candidate or an all-whitespace reply all count
/// as a malformed response.
pub fn extract_reply(response: &GeminiResponse) -> Result<String, ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ProviderError::MalformedResponse(format!(
            "prompt blocked by provider: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| ProviderError::MalformedResponse("no candidates in response".into()))?;

    let text = candidate
        .content
        .as_ref()
        .and_then(extract_content)
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(ProviderError::MalformedResponse(format!(
            "empty reply (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gemini::types::GeminiPart;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GeminiResponse {
        serde_json::from_value(value).unwrap()
    }

    fn text_part(text: &str, thought: bool) -> GeminiPart {
        GeminiPart {
            text: Some(text.to_string()),
            thought,
        }
    }

    // ============================================================================
    // extract_content tests
    // ============================================================================

    #[test]
    fn test_extract_content_single_text() {
        let content = GeminiContent {
            role: Some("model".to_string()),
            parts: vec![text_part("Department: Cardiology", false)],
        };
        assert_eq!(
            extract_content(&content),
            Some("Department: Cardiology".to_string())
        );
    }

    #[test]
    fn test_extract_content_joins_parts() {
        let content = GeminiContent {
            role: Some("model".to_string()),
            parts: vec![text_part("Department: ", false), text_part("Urology", false)],
        };
        assert_eq!(
            extract_content(&content),
            Some("Department: Urology".to_string())
        );
    }

    #[test]
    fn test_extract_content_skips_thoughts() {
        let content = GeminiContent {
            role: Some("model".to_string()),
            parts: vec![
                text_part("Considering cardiac causes first...", true),
                text_part("Department: Cardiology", false),
            ],
        };
        assert_eq!(
            extract_content(&content),
            Some("Department: Cardiology".to_string())
        );
    }

    #[test]
    fn test_extract_content_empty_parts() {
        let content = GeminiContent::default();
        assert_eq!(extract_content(&content), None);
    }

    // ============================================================================
    // extract_reply tests
    // ============================================================================

    #[test]
    fn test_extract_reply_ok() {
        let r = response(json!({
            "candidates": [{"content": {"parts": [{"text": "Department: Neurology"}]}}]
        }));
        assert_eq!(extract_reply(&r).unwrap(), "Department: Neurology");
    }

    #[test]
    fn test_extract_reply_blocked() {
        let r = response(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let err = extract_reply(&r).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_reply_no_candidates() {
        let r = response(json!({"candidates": []}));
        assert!(matches!(
            extract_reply(&r),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_reply_whitespace_only() {
        let r = response(json!({
            "candidates": [{"content": {"parts": [{"text": "  \n "}]}, "finishReason": "MAX_TOKENS"}]
        }));
        let err = extract_reply(&r).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_extract_reply_candidate_without_content() {
        let r = response(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(matches!(
            extract_reply(&r),
            Err(ProviderError::MalformedResponse(_))
        ));
    }
}
