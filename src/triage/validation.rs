// src/triage/validation.rs
// Input schema validation for triage requests

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::types::TriageRequest;

pub const MAX_AGE: u64 = 130;
pub const MAX_SYMPTOMS: usize = 32;
pub const MAX_SYMPTOM_CHARS: usize = 200;
pub const MAX_GENDER_CHARS: usize = 64;

const KNOWN_FIELDS: &[&str] = &["gender", "age", "symptoms"];

/// How to treat fields the schema does not know about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Ignore unknown fields
    #[default]
    Lenient,
    /// Reject unknown fields
    Strict,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" | "false" | "0" | "no" | "off" => Ok(Self::Lenient),
            "strict" | "true" | "1" | "yes" | "on" => Ok(Self::Strict),
            other => Err(format!("unknown validation mode: {}", other)),
        }
    }
}

/// One offending field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Input rejected before any provider call; lists every offending field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid triage request: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Whether `field` is among the offending fields
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a raw JSON body into a `TriageRequest`.
///
/// All problems are collected, not just the first one.
pub fn validate(input: &Value, mode: ValidationMode) -> Result<TriageRequest, ValidationError> {
    let Some(object) = input.as_object() else {
        return Err(ValidationError::single("body", "must be a JSON object"));
    };

    let mut errors = Vec::new();

    if mode == ValidationMode::Strict {
        for key in object.keys() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                errors.push(FieldError::new(key.clone(), "unknown field"));
            }
        }
    }

    let gender = validate_gender(object, &mut errors);
    let age = validate_age(object, &mut errors);
    let symptoms = validate_symptoms(object, &mut errors);

    match (gender, age, symptoms) {
        (Some(gender), Some(age), Some(symptoms)) if errors.is_empty() => {
            Ok(TriageRequest::new(gender, age, symptoms))
        }
        _ => Err(ValidationError { fields: errors }),
    }
}

fn validate_gender(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match object.get("gender") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("gender", "is required"));
            None
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                errors.push(FieldError::new("gender", "must not be empty"));
                None
            } else if trimmed.chars().count() > MAX_GENDER_CHARS {
                errors.push(FieldError::new(
                    "gender",
                    format!("must be at most {} characters", MAX_GENDER_CHARS),
                ));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            errors.push(FieldError::new("gender", "must be a string"));
            None
        }
    }
}

fn validate_age(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<u8> {
    let range_msg = || format!("must be between 0 and {}", MAX_AGE);

    match object.get("age") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("age", "is required"));
            None
        }
        Some(Value::Number(n)) => {
            if let Some(age) = n.as_u64() {
                if age <= MAX_AGE {
                    // MAX_AGE fits in u8
                    Some(age as u8)
                } else {
                    errors.push(FieldError::new("age", range_msg()));
                    None
                }
            } else if n.is_i64() {
                errors.push(FieldError::new("age", range_msg()));
                None
            } else {
                errors.push(FieldError::new("age", "must be an integer"));
                None
            }
        }
        Some(_) => {
            errors.push(FieldError::new("age", "must be an integer"));
            None
        }
    }
}

fn validate_symptoms(
    object: &Map<String, Value>,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    let items = match object.get("symptoms") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("symptoms", "is required"));
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(FieldError::new("symptoms", "must be an array of strings"));
            return None;
        }
    };

    if items.is_empty() {
        errors.push(FieldError::new("symptoms", "must contain at least one symptom"));
        return None;
    }
    if items.len() > MAX_SYMPTOMS {
        errors.push(FieldError::new(
            "symptoms",
            format!("must contain at most {} symptoms", MAX_SYMPTOMS),
        ));
        return None;
    }

    let before = errors.len();
    let mut symptoms = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let field = format!("symptoms[{}]", idx);
        match item {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    errors.push(FieldError::new(field, "must not be empty"));
                } else if trimmed.chars().count() > MAX_SYMPTOM_CHARS {
                    errors.push(FieldError::new(
                        field,
                        format!("must be at most {} characters", MAX_SYMPTOM_CHARS),
                    ));
                } else {
                    symptoms.push(trimmed.to_string());
                }
            }
            _ => errors.push(FieldError::new(field, "must be a string")),
        }
    }

    (errors.len() == before).then_some(symptoms)
}
