// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::str::FromStr;
use std::time::Duration;
use tracing::{Level, debug, info};

use crate::llm::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_API_BASE, GeminiClient,
    MAX_RETRIES_CAP, Provider, RetryPolicy,
};
use crate::triage::{ResponseFormat, ServiceOptions, ValidationMode};

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 75;
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Gemini connection settings
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// GEMINI_API_KEY, falling back to GOOGLE_API_KEY
    pub api_key: Option<String>,
    /// TRIAGE_MODEL
    pub model: String,
    /// TRIAGE_GEMINI_BASE_URL
    pub base_url: String,
    /// TRIAGE_TEMPERATURE
    pub temperature: f32,
    /// TRIAGE_MAX_OUTPUT_TOKENS
    pub max_output_tokens: u32,
    /// TRIAGE_PROVIDER_TIMEOUT_SECS
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &mut EnvReader<F>) -> Self {
        let defaults = Self::default();
        let api_key = Provider::Gemini
            .api_key_env_vars()
            .iter()
            .find_map(|name| env.key(name));

        if api_key.is_some() {
            debug!("Gemini API key loaded");
        }

        Self {
            api_key,
            model: env.key("TRIAGE_MODEL").unwrap_or(defaults.model),
            base_url: env.key("TRIAGE_GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            temperature: env.parse("TRIAGE_TEMPERATURE", defaults.temperature),
            max_output_tokens: env.parse("TRIAGE_MAX_OUTPUT_TOKENS", defaults.max_output_tokens),
            timeout: Duration::from_secs(
                env.parse("TRIAGE_PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS),
            ),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Pipeline behaviour around the provider call
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// TRIAGE_REQUEST_DEADLINE_SECS
    pub deadline: Duration,
    /// TRIAGE_MAX_RETRIES, as given (clamped when the policy is built)
    pub max_retries: u32,
    /// TRIAGE_RETRY_BACKOFF_MS
    pub retry_backoff: Duration,
    /// TRIAGE_RESPONSE_FORMAT
    pub response_format: ResponseFormat,
    /// TRIAGE_STRICT_INPUT
    pub validation_mode: ValidationMode,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(DEFAULT_REQUEST_DEADLINE_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            response_format: ResponseFormat::default(),
            validation_mode: ValidationMode::default(),
        }
    }
}

impl TriageConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &mut EnvReader<F>) -> Self {
        Self {
            deadline: Duration::from_secs(
                env.parse("TRIAGE_REQUEST_DEADLINE_SECS", DEFAULT_REQUEST_DEADLINE_SECS),
            ),
            max_retries: env.parse("TRIAGE_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            retry_backoff: Duration::from_millis(
                env.parse("TRIAGE_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS),
            ),
            response_format: env.parse("TRIAGE_RESPONSE_FORMAT", ResponseFormat::default()),
            // "true"/"1"/"yes" map to strict, "false"/"0"/"no" to lenient
            validation_mode: env.parse("TRIAGE_STRICT_INPUT", ValidationMode::default()),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_backoff)
    }
}

/// Listener and logging settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TRIAGE_HOST
    pub host: String,
    /// TRIAGE_PORT
    pub port: u16,
    /// TRIAGE_LOG_LEVEL
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServerConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &mut EnvReader<F>) -> Self {
        Self {
            host: env.key("TRIAGE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.parse("TRIAGE_PORT", DEFAULT_PORT),
            log_level: env
                .key("TRIAGE_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed log level, `INFO` when unrecognised
    pub fn level(&self) -> Level {
        parse_level(&self.log_level)
    }
}

/// TRIAGE_LOG_LEVEL straight from the process environment, for installing
/// the subscriber before the rest of the configuration is read
pub fn log_level_from_env() -> Level {
    std::env::var("TRIAGE_LOG_LEVEL")
        .map(|raw| parse_level(&raw))
        .unwrap_or(Level::INFO)
}

fn parse_level(raw: &str) -> Level {
    Level::from_str(raw.trim()).unwrap_or(Level::INFO)
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            lines.extend(self.errors.iter().map(|e| format!("  - {}", e)));
        }
        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().map(|w| format!("  - {}", w)));
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub provider: ProviderConfig,
    pub triage: TriageConfig,
    pub server: ServerConfig,
    /// Values that were set but could not be parsed, reported by `validate`
    load_warnings: Vec<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup, after dotenvy)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut env = EnvReader::new(lookup);
        let provider = ProviderConfig::from_env(&mut env);
        let triage = TriageConfig::from_env(&mut env);
        let server = ServerConfig::from_env(&mut env);

        Self {
            provider,
            triage,
            server,
            load_warnings: env.warnings,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();
        for warning in &self.load_warnings {
            validation.add_warning(warning.clone());
        }

        if !self.provider.has_api_key() {
            validation.add_error("No Gemini API key configured. Set GEMINI_API_KEY or GOOGLE_API_KEY.");
        }
        if self.provider.model.trim().is_empty() {
            validation.add_error("TRIAGE_MODEL must not be empty");
        }
        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            validation.add_error(format!(
                "TRIAGE_GEMINI_BASE_URL '{}' is not an http(s) URL",
                self.provider.base_url
            ));
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            validation.add_error(format!(
                "TRIAGE_TEMPERATURE {} is outside 0.0..=2.0",
                self.provider.temperature
            ));
        }
        if self.provider.max_output_tokens == 0 {
            validation.add_error("TRIAGE_MAX_OUTPUT_TOKENS must be greater than 0");
        }
        if self.provider.timeout.is_zero() {
            validation.add_error("TRIAGE_PROVIDER_TIMEOUT_SECS must be greater than 0");
        }
        if self.triage.deadline.is_zero() {
            validation.add_error("TRIAGE_REQUEST_DEADLINE_SECS must be greater than 0");
        }

        if self.triage.max_retries > MAX_RETRIES_CAP {
            validation.add_warning(format!(
                "TRIAGE_MAX_RETRIES {} exceeds the cap, using {}",
                self.triage.max_retries, MAX_RETRIES_CAP
            ));
        }
        if self.triage.deadline < self.provider.timeout {
            validation.add_warning(format!(
                "Request deadline ({}s) is shorter than the provider timeout ({}s)",
                self.triage.deadline.as_secs(),
                self.provider.timeout.as_secs()
            ));
        }
        if Level::from_str(self.server.log_level.trim()).is_err() {
            validation.add_warning(format!(
                "Unknown TRIAGE_LOG_LEVEL '{}', using info",
                self.server.log_level
            ));
        }

        validation
    }

    /// Gemini client configured from the provider section
    pub fn gemini_client(&self) -> anyhow::Result<GeminiClient> {
        let api_key = self
            .provider
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY (or GOOGLE_API_KEY) is not set"))?;

        Ok(GeminiClient::with_model(api_key, self.provider.model.clone())
            .base_url(self.provider.base_url.clone())
            .generation(self.provider.temperature, self.provider.max_output_tokens)
            .json_output(self.triage.response_format == ResponseFormat::Json)
            .request_timeout(self.provider.timeout))
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            response_format: self.triage.response_format,
            validation_mode: self.triage.validation_mode,
            retry: self.triage.retry_policy(),
            deadline: self.triage.deadline,
        }
    }
}

/// Variable source that remembers values it had to discard
struct EnvReader<F> {
    lookup: F,
    warnings: Vec<String>,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            warnings: Vec::new(),
        }
    }

    /// Read a variable, filtering empty values
    fn key(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse a variable, falling back to `default` on bad input
    fn parse<T: FromStr>(&mut self, name: &str, default: T) -> T {
        let Some(raw) = self.key(name) else {
            return default;
        };
        match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                debug!(variable = name, value = %raw, "Could not parse configuration value");
                self.warnings
                    .push(format!("Could not parse {}='{}', using the default", name, raw));
                default
            }
        }
    }
}
