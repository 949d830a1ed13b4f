// src/llm/gemini/mod.rs
// Google Gemini API client

mod client;
mod extraction;
pub mod types;

pub use client::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_API_BASE, GeminiClient,
};
