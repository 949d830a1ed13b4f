// src/lib.rs
// Hospital triage recommender - library root

pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod triage;
pub mod web;
