// src/triage/mod.rs
// Department recommendation: validation, prompt, reply parsing, orchestration

pub mod department;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod types;
pub mod validation;

pub use department::{DEPARTMENTS, Department, canonicalize};
pub use parser::{UnparsableResponse, parse_reply};
pub use prompt::{ResponseFormat, build_prompt};
pub use service::{ServiceOptions, TriageService};
pub use types::{PromptPayload, TriageRequest, TriageResponse};
pub use validation::{FieldError, ValidationError, ValidationMode, validate};
