//! Ollama-backed generation engine.
//!
//! Posts a fully rendered prompt to an Ollama-compatible `/api/generate`
//! endpoint. The client is blocking because the engine contract is
//! synchronous; the worker invokes it on a blocking thread, so the HTTP
//! client is built lazily there rather than inside the async runtime.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::{build_prompt, build_request, clean_output};
use super::{EngineConfig, EngineError, GenerationEngine};
use crate::types::VacancyParams;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Generation engine speaking the Ollama generate API.
pub struct OllamaEngine {
    config: EngineConfig,
    client: OnceLock<reqwest::blocking::Client>,
}

impl OllamaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, client: OnceLock::new() }
    }

    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(self.config.timeout)
                .build()
                .expect("Failed to create HTTP client")
        })
    }
}

impl GenerationEngine for OllamaEngine {
    fn generate(&self, params: &VacancyParams) -> Result<String, EngineError> {
        let request = build_request(params);
        let prompt = build_prompt(&self.config.system_prompt, &request);
        let url = format!("{}/api/generate", self.config.base_url);
        debug!(url = %url, model = %self.config.model, "Sending generate request");

        let response = self
            .client()
            .post(&url)
            .json(&GenerateRequest {
                model: &self.config.model,
                prompt: &prompt,
                stream: false,
                options: GenerateOptions { num_predict: self.config.max_new_tokens },
            })
            .send()
            .map_err(|e| EngineError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EngineError::Generation(format!(
                "backend returned status {status}: {body}"
            )));
        }

        let result: GenerateResponse = response
            .json()
            .map_err(|e| EngineError::Generation(e.to_string()))?;

        Ok(clean_output(&result.response))
    }

    fn describe(&self) -> String {
        format!("{} @ {}", self.config.model, self.config.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let engine = OllamaEngine::new(EngineConfig::default());
        assert_eq!(engine.describe(), "llama3.2:3b @ http://localhost:11434");
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.2:3b",
            prompt: "hello",
            stream: false,
            options: GenerateOptions { num_predict: 128 },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.2:3b");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 128);
    }
}
