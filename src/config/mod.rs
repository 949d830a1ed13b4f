// src/config/mod.rs
// Configuration loaded from the environment

pub mod env;

pub use env::{
    ConfigValidation, EnvConfig, ProviderConfig, ServerConfig, TriageConfig, log_level_from_env,
};
