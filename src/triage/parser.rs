// src/triage/parser.rs
// Department extraction from free-text model replies
//
// Best-effort text extraction, not a protocol. Models drift from the
// requested format; the fallbacks below cover the drift seen in practice but
// cannot guarantee a correct read of arbitrary prose. Use the JSON response
// format when stronger guarantees are needed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::department::{canonicalize, find_mention};
use super::types::TriageResponse;

/// Longest fallback line still treated as a department name
const MAX_NAME_WORDS: usize = 8;
const MAX_NAME_CHARS: usize = 80;
/// Longest unknown name accepted from an unlabelled line
const MAX_BARE_NAME_WORDS: usize = 4;

/// Separators between a department name and trailing reasoning or a leading label
const NAME_SEPARATORS: &[&str] = &[" - ", " \u{2013} ", " \u{2014} ", ": ", " ("];

/// Words that mark an unlabelled line as a sentence rather than a name
const PROSE_MARKERS: &[&str] = &[
    " is ", " are ", " be ", " should ", " would ", " could ", " i ", " we ", "recommend",
    "suggest", "based on",
];

static DEPARTMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[\s#>*_\-]*(?:recommended\s+)?department(?:\s+name)?[\s*_]*[:：][\s*_]*(.*?)[\s*_]*$",
    )
    .expect("valid department label regex")
});

static EXPLANATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[\s#>*_\-]*(?:explanation|reason|reasoning|rationale|justification)[\s*_]*[:：][\s*_]*(.*?)[\s*_]*$",
    )
    .expect("valid explanation label regex")
});

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[.)]\s*|[-*+•]\s+)").expect("valid list marker regex"));

const DISCLAIMER_MARKERS: &[&str] = &[
    "not a doctor",
    "not a medical professional",
    "not a substitute",
    "not medical advice",
    "as an ai",
    "i am an ai",
    "i'm an ai",
    "language model",
    "cannot provide medical",
    "can't provide medical",
    "cannot diagnose",
    "can't diagnose",
    "consult a",
    "consult with",
    "consult your",
    "seek medical",
    "seek professional",
    "seek immediate",
    "i'm sorry",
    "i am sorry",
    "i cannot",
    "i can't",
    "unable to",
];

/// The reply did not contain a recognisable department
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not extract a department from the model reply: {reason}")]
pub struct UnparsableResponse {
    pub reason: String,
}

impl UnparsableResponse {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Extract a department (and optional explanation) from a model reply.
///
/// Tries, in order: a JSON object, a `Department:` label line, the first
/// plausible non-disclaimer line, then any catalogue department mentioned in
/// the text. Known departments come back in catalogue spelling.
pub fn parse_reply(raw: &str) -> Result<TriageResponse, UnparsableResponse> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(UnparsableResponse::new("reply is empty"));
    }

    if let Some(result) = parse_json(text) {
        return result;
    }

    if let Some(response) = parse_labels(text) {
        return Ok(response);
    }

    parse_fallback(text)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (```json) on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// `None` when the reply is not a JSON object at all
fn parse_json(text: &str) -> Option<Result<TriageResponse, UnparsableResponse>> {
    if !text.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    let Some(department) = ["department", "recommended_department"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(clean_name)
        .find(|d| is_plausible_name(d))
    else {
        return Some(Err(UnparsableResponse::new(
            "JSON reply has no usable department field",
        )));
    };

    let explanation = ["explanation", "reasoning", "reason"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty());

    Some(Ok(build_response(&department, explanation)))
}

fn parse_labels(text: &str) -> Option<TriageResponse> {
    let lines: Vec<&str> = text.lines().collect();

    let department = lines.iter().find_map(|line| {
        DEPARTMENT_LINE
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| clean_name(m.as_str()))
            .filter(|d| is_plausible_name(d))
    })?;

    Some(build_response(&department, extract_explanation(&lines)))
}

/// Explanation label value plus any continuation lines up to a blank line
fn extract_explanation(lines: &[&str]) -> Option<String> {
    let (idx, first) = lines.iter().enumerate().find_map(|(idx, line)| {
        EXPLANATION_LINE
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| (idx, m.as_str().trim().to_string()))
    })?;

    let mut parts = Vec::new();
    if !first.is_empty() {
        parts.push(first);
    }
    for line in &lines[idx + 1..] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if parts.is_empty() {
                continue;
            }
            break;
        }
        if is_label_line(line) {
            break;
        }
        parts.push(trimmed.to_string());
    }

    let joined = parts.join(" ");
    (!joined.is_empty()).then_some(joined)
}

fn parse_fallback(text: &str) -> Result<TriageResponse, UnparsableResponse> {
    let candidates: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_disclaimer(line) && !is_label_line(line))
        .collect();

    let Some(first) = candidates.first() else {
        return Err(UnparsableResponse::new("reply contains only disclaimers"));
    };

    let name = clean_name(first);
    if let Some(known) = known_department(&name) {
        return Ok(TriageResponse::new(known));
    }

    if let Some(mentioned) = candidates.iter().find_map(|line| find_mention(line)) {
        return Ok(TriageResponse::new(mentioned));
    }

    if is_bare_name(&name) {
        return Ok(build_response(&name, None));
    }

    Err(UnparsableResponse::new("no department name found in reply"))
}

/// Catalogue department named by the whole line, or by one side of a
/// `Name - reason` / `Label: Name` split
fn known_department(line: &str) -> Option<&'static str> {
    canonicalize(line).or_else(|| {
        NAME_SEPARATORS
            .iter()
            .filter_map(|sep| line.split_once(sep))
            .find_map(|(head, tail)| {
                canonicalize(&clean_name(head)).or_else(|| canonicalize(&clean_name(tail)))
            })
    })
}

fn build_response(department: &str, explanation: Option<String>) -> TriageResponse {
    let department = canonicalize(department)
        .map(str::to_string)
        .unwrap_or_else(|| department.to_string());
    TriageResponse {
        department,
        explanation,
    }
}

/// Strip list numbering, markdown emphasis, quotes and trailing punctuation
fn clean_name(raw: &str) -> String {
    let s = raw.trim();
    let s = LIST_MARKER.replace(s, "");
    let s = s.trim_matches(|c: char| matches!(c, '*' | '_' | '#' | '`' | '"' | '\'' | ' '));
    let s = s.trim_end_matches(['.', '!', ',', ';']);
    s.trim().to_string()
}

/// Unknown department names only pass through when they read like a name,
/// not a sentence or a lead-in to the next line
fn is_bare_name(name: &str) -> bool {
    let padded = format!(" {} ", name.to_lowercase());
    is_plausible_name(name)
        && !name.ends_with(':')
        && name.split_whitespace().count() <= MAX_BARE_NAME_WORDS
        && !PROSE_MARKERS.iter().any(|m| padded.contains(m))
}

fn is_plausible_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().any(char::is_alphabetic)
        && !name.contains(['{', '}', '[', ']', '<', '>', '='])
        && name.chars().count() <= MAX_NAME_CHARS
        && name.split_whitespace().count() <= MAX_NAME_WORDS
        && !is_disclaimer(name)
}

/// Label lines left over after label parsing failed (e.g. a bare `Department:`)
fn is_label_line(line: &str) -> bool {
    DEPARTMENT_LINE.is_match(line) || EXPLANATION_LINE.is_match(line)
}

fn is_disclaimer(line: &str) -> bool {
    let lowered = line.to_lowercase();
    DISCLAIMER_MARKERS.iter().any(|m| lowered.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(raw: &str) -> String {
        parse_reply(raw).unwrap().department
    }

    // ============================================================================
    // Label format
    // ============================================================================

    #[test]
    fn test_label_exact() {
        let response = parse_reply("Department: Neurology").unwrap();
        assert_eq!(response.department, "Neurology");
        assert_eq!(response.explanation, None);
    }

    #[test]
    fn test_label_with_explanation() {
        let response = parse_reply(
            "Department: Cardiology\nExplanation: Chest pain with shortness of breath\nsuggests a cardiac cause.",
        )
        .unwrap();
        assert_eq!(response.department, "Cardiology");
        assert_eq!(
            response.explanation.as_deref(),
            Some("Chest pain with shortness of breath suggests a cardiac cause.")
        );
    }

    #[test]
    fn test_label_markdown_bold() {
        assert_eq!(department("**Department:** Neurology"), "Neurology");
        assert_eq!(department("Department: **Neurology**"), "Neurology");
        assert_eq!(department("## Recommended Department: Urology."), "Urology");
    }

    #[test]
    fn test_label_after_preamble() {
        let reply = "Based on the symptoms provided:\n\nDepartment: Pulmonology\nReason: Persistent cough.";
        let response = parse_reply(reply).unwrap();
        assert_eq!(response.department, "Pulmonology");
        assert_eq!(response.explanation.as_deref(), Some("Persistent cough."));
    }

    #[test]
    fn test_label_case_insensitive_and_canonicalized() {
        assert_eq!(department("department: ent"), "ENT (Ear, Nose, Throat)");
        assert_eq!(department("DEPARTMENT: internal medicine"), "Internal Medicine");
    }

    #[test]
    fn test_label_unknown_department_passes_through() {
        assert_eq!(department("Department: Oncology"), "Oncology");
    }

    #[test]
    fn test_empty_label_falls_through() {
        let reply = "Department:\nNeurology";
        assert_eq!(department(reply), "Neurology");
    }

    // ============================================================================
    // JSON format
    // ============================================================================

    #[test]
    fn test_json_object() {
        let response =
            parse_reply(r#"{"department": "Neurology", "explanation": "Gait and balance issues."}"#)
                .unwrap();
        assert_eq!(response.department, "Neurology");
        assert_eq!(
            response.explanation.as_deref(),
            Some("Gait and balance issues.")
        );
    }

    #[test]
    fn test_json_in_code_fence_with_legacy_key() {
        let reply = "```json\n{\"recommended_department\": \"Gastroenterology\"}\n```";
        let response = parse_reply(reply).unwrap();
        assert_eq!(response.department, "Gastroenterology");
        assert_eq!(response.explanation, None);
    }

    #[test]
    fn test_json_without_department_is_unparsable() {
        assert!(parse_reply(r#"{"urgency": "high"}"#).is_err());
    }

    // ============================================================================
    // Fallbacks
    // ============================================================================

    #[test]
    fn test_first_line_fallback() {
        assert_eq!(department("Neurology"), "Neurology");
        assert_eq!(department("1. Dermatology\n2. Internal Medicine"), "Dermatology");
        assert_eq!(department("- Orthopaedics"), "Orthopedics");
    }

    #[test]
    fn test_fallback_skips_leading_disclaimer() {
        let reply = "I am not a doctor, but based on the information given:\nPsychiatry";
        assert_eq!(department(reply), "Psychiatry");
    }

    #[test]
    fn test_fallback_sentence_naming_department() {
        assert_eq!(department("The recommended department is Neurology."), "Neurology");
        assert_eq!(department("I would suggest Cardiology"), "Cardiology");
    }

    #[test]
    fn test_fallback_lead_in_line_then_name() {
        let reply = "Based on the symptoms, I recommend:\nNeurology";
        assert_eq!(department(reply), "Neurology");
    }

    #[test]
    fn test_fallback_other_label_before_name() {
        assert_eq!(department("Recommendation: Neurology"), "Neurology");
        assert_eq!(department("Answer: ENT"), "ENT (Ear, Nose, Throat)");
    }

    #[test]
    fn test_fallback_name_with_trailing_reason() {
        assert_eq!(
            department("Neurology - due to dizziness and gait issues"),
            "Neurology"
        );
        assert_eq!(department("Urology (possible kidney stones)"), "Urology");
    }

    #[test]
    fn test_fallback_unknown_bare_name_passes_through() {
        assert_eq!(department("Oncology"), "Oncology");
        assert_eq!(department("Sports Medicine."), "Sports Medicine");
    }

    #[test]
    fn test_fallback_rejects_unknown_prose() {
        assert!(parse_reply("Based on the symptoms, I recommend:").is_err());
        assert!(parse_reply("The patient should see a specialist soon").is_err());
        assert!(parse_reply("Further tests are needed").is_err());
    }

    #[test]
    fn test_fallback_mention_in_prose() {
        let reply = "The combination of dizziness, nausea and difficulty walking points to a neurological cause, so the patient should be seen in Neurology as soon as possible.";
        assert_eq!(department(reply), "Neurology");
    }

    // ============================================================================
    // Unparsable replies
    // ============================================================================

    #[test]
    fn test_empty_reply() {
        assert!(parse_reply("").is_err());
        assert!(parse_reply("   \n\t").is_err());
        assert!(parse_reply("```\n```").is_err());
    }

    #[test]
    fn test_disclaimer_only_reply() {
        let reply = "I'm sorry, but I cannot provide medical advice.\nPlease consult a healthcare professional.";
        let err = parse_reply(reply).unwrap_err();
        assert!(err.reason.contains("disclaimers"));
    }

    #[test]
    fn test_label_with_refusal_is_unparsable() {
        assert!(parse_reply("Department: I cannot determine this").is_err());
    }

    #[test]
    fn test_long_prose_without_department() {
        let reply = "The symptoms described could have many different causes and need further assessment before any routing decision is made.";
        assert!(parse_reply(reply).is_err());
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  \"Neurology.\" "), "Neurology");
        assert_eq!(clean_name("3) Urology"), "Urology");
        assert_eq!(clean_name("`Cardiology`"), "Cardiology");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("plain"), "plain");
    }
}
