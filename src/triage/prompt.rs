// src/triage/prompt.rs
// Triage prompt template

use std::fmt::Write;
use std::str::FromStr;

use super::department::DEPARTMENTS;
use super::types::{PromptPayload, TriageRequest};

/// Label the model is told to put in front of its answer
pub const DEPARTMENT_LABEL: &str = "Department:";
pub const EXPLANATION_LABEL: &str = "Explanation:";

/// Reply shape requested from the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `Department: <name>` line, optional `Explanation:` line
    #[default]
    Label,
    /// A single JSON object with `department` and `explanation` keys
    Json,
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "label" | "text" => Ok(Self::Label),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown response format: {}", other)),
        }
    }
}

const ROLE: &str = "You are an expert medical triage assistant helping hospital staff route patients to the appropriate department.\n\
Your task is to analyze the patient information below and recommend the single most suitable hospital department.";

const INSTRUCTIONS: &str = "INSTRUCTIONS:\n\
1. Analyze the symptoms carefully, considering the patient's age and gender\n\
2. Identify the primary medical concern\n\
3. Consider symptom combinations that might indicate specific conditions\n\
4. Recommend the SINGLE most appropriate department from the list above, using its exact name";

const CONSIDERATIONS: &str = "IMPORTANT CONSIDERATIONS:\n\
- Symptoms may be given in Indonesian: \"pusing\" (dizziness), \"mual\" (nausea) and \"sulit berjalan\" (difficulty walking) together suggest neurological issues\n\
- Chest pain with shortness of breath: likely Cardiology or Emergency Medicine\n\
- Multiple vague symptoms in elderly patients: consider Geriatrics or Internal Medicine\n\
- Severe or life-threatening symptoms: Emergency Medicine\n\
- Children under 18: consider Pediatrics unless a specialist is clearly needed";

/// Render the prompt for a validated request. Pure and deterministic.
pub fn build_prompt(request: &TriageRequest, format: ResponseFormat) -> PromptPayload {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(ROLE);
    prompt.push_str("\n\nPATIENT INFORMATION:\n");
    let _ = writeln!(prompt, "- Gender: {}", request.gender());
    let _ = writeln!(prompt, "- Age: {} years old", request.age());
    prompt.push_str("- Symptoms:\n");
    for symptom in request.symptoms() {
        let _ = writeln!(prompt, "  - {}", symptom);
    }

    prompt.push_str("\nAVAILABLE DEPARTMENTS:\n");
    for (idx, dept) in DEPARTMENTS.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {} - {}", idx + 1, dept.name, dept.scope);
    }

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(CONSIDERATIONS);
    prompt.push_str("\n\n");
    prompt.push_str(&output_format_instructions(format));

    PromptPayload::new(prompt)
}

fn output_format_instructions(format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Label => format!(
            "OUTPUT FORMAT:\n\
Respond with exactly these lines and nothing else:\n\
{} <department name>\n\
{} <one or two sentences explaining the choice>\n\
The first line is mandatory. Do not add disclaimers, greetings or markdown.",
            DEPARTMENT_LABEL, EXPLANATION_LABEL
        ),
        ResponseFormat::Json => "OUTPUT FORMAT:\n\
Respond with ONLY a JSON object, no additional text or markdown formatting:\n\
{\"department\": \"<department name>\", \"explanation\": \"<one or two sentences explaining the choice>\"}"
            .to_string(),
    }
}
