//! Generation engine boundary.
//!
//! The engine is a stateful, single-threaded text-generation resource. It
//! is exclusively owned by the worker and invoked by exactly one caller at
//! a time, so implementations need no internal locking. The call is
//! synchronous and has no cancellation: once started, a generation runs to
//! completion (or failure).

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaEngine;

use std::time::Duration;

use crate::types::VacancyParams;

/// Generation call failure. A single kind: the engine offers no finer
/// classification to the queue core.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Generation failed: {0}")]
    Generation(String),
}

/// Synchronous text-generation resource.
pub trait GenerationEngine: Send + Sync {
    /// Generate vacancy text for the given parameters. Blocking; the
    /// worker runs it on a blocking thread.
    fn generate(&self, params: &VacancyParams) -> Result<String, EngineError>;

    /// Human-readable description of the underlying model.
    fn describe(&self) -> String;
}

/// Default system prompt, carried over from the original service: a
/// Russian-language recruiting assistant instructed not to invent details.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Пожалуйста, отвечайте на русском языке. \
Ты полезный ассистент, твоя задача помогать компаниям с созданием интересного и \
необычного текста вакансий. Если какой-то пункт пустой, то не добавляй его в свой \
ответ. Если что-то не указано или ты в чём то не уверен, то не придумывай ничего \
лишнего, лучше промолчи, однако, если ты считаешь, что некоторые требования \
необходимы для данной должности, добавь их.";

/// Configuration for the generation engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the Ollama-compatible backend.
    pub base_url: String,

    /// Model name to generate with.
    pub model: String,

    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,

    /// HTTP timeout for a single generation call.
    pub timeout: Duration,

    /// System prompt wrapped around every request.
    pub system_prompt: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            max_new_tokens: 2048,
            timeout: Duration::from_secs(300), // generations are slow
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VACGEN_ENGINE_URL") {
            config.base_url = val;
        }

        if let Ok(val) = std::env::var("VACGEN_ENGINE_MODEL") {
            config.model = val;
        }

        if let Ok(val) = std::env::var("VACGEN_MAX_NEW_TOKENS") {
            if let Ok(n) = val.parse() {
                config.max_new_tokens = n;
            }
        }

        if let Ok(val) = std::env::var("VACGEN_ENGINE_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                config.timeout = Duration::from_secs(n);
            }
        }

        if let Ok(val) = std::env::var("VACGEN_SYSTEM_PROMPT") {
            config.system_prompt = val;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.max_new_tokens, 2048);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }
}
