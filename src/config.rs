use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Medguard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "medguard=info"
}

const DEFAULT_MODEL: &str = "medgemma";
const DEFAULT_TEMPERATURE: f32 = 0.4;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Maximum characters of the raw query retained in an audit entry.
pub const AUDIT_EXCERPT_LEN: usize = 500;

/// Maximum query length accepted before truncation during input sanitization.
pub const MAX_QUERY_LENGTH: usize = 2_000;

/// Immutable pipeline configuration, loaded once at process start.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model identifier passed to the generation endpoint.
    pub model: String,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// Output token cap for a single generation.
    pub max_output_tokens: u32,
    /// Base URL of the generation endpoint.
    pub base_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Resolve configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: env::var("MEDGUARD_MODEL").unwrap_or(defaults.model),
            temperature: env::var("MEDGUARD_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            max_output_tokens: env::var("MEDGUARD_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_output_tokens),
            base_url: env::var("MEDGUARD_BASE_URL").unwrap_or(defaults.base_url),
        }
    }
}
