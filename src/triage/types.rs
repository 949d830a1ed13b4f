// src/triage/types.rs
// Request/response types for department recommendation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated triage request.
///
/// Only `validate` constructs one, so every instance satisfies the input
/// constraints (trimmed non-empty gender, age within range, at least one
/// trimmed non-empty symptom).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageRequest {
    gender: String,
    age: u8,
    symptoms: Vec<String>,
}

impl TriageRequest {
    pub(crate) fn new(gender: String, age: u8, symptoms: Vec<String>) -> Self {
        Self {
            gender,
            age,
            symptoms,
        }
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    /// Symptoms in the order the caller listed them
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }
}

/// Department recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResponse {
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl TriageResponse {
    pub fn new(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// Rendered prompt text, ready for the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload(String);

impl PromptPayload {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
