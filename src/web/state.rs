// src/web/state.rs
// Web server state

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::triage::TriageService;

/// Shared application state; immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TriageService>,
}

impl AppState {
    pub fn new(service: TriageService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// The LLM client behind the service, for health reporting
    pub fn client(&self) -> &Arc<dyn LlmClient> {
        self.service.client()
    }
}
