// src/web/api.rs
// REST API handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde_json::{Value, json};

use crate::triage::TriageResponse;
use crate::web::error::ApiResult;
use crate::web::state::AppState;

// ═══════════════════════════════════════
// SERVICE INFO
// ═══════════════════════════════════════

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Hospital Triage System API",
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /recommend": "Get department recommendation for patient",
            "GET /health": "Check API health status",
            "GET /example": "Example request and response"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let client = state.client();
    Json(json!({
        "status": "healthy",
        "provider": client.provider_type().to_string(),
        "model": client.model_name()
    }))
}

pub async fn example() -> impl IntoResponse {
    Json(json!({
        "example_request": {
            "gender": "female",
            "age": 62,
            "symptoms": ["pusing", "mual", "sulit berjalan"]
        },
        "example_response": TriageResponse::new("Neurology").with_explanation(
            "Combination of dizziness, nausea, and difficulty walking suggests potential neurological issues that require specialist evaluation."
        )
    }))
}

// ═══════════════════════════════════════
// RECOMMENDATION
// ═══════════════════════════════════════

/// Recommend a department for one patient.
///
/// The body is taken as raw JSON so validation can report every offending
/// field at once instead of failing on the first serde error.
pub async fn recommend(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<TriageResponse>> {
    let Json(body) = body?;
    let response = state.service.recommend(&body).await?;
    Ok(Json(response))
}
