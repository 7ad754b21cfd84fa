// ABOUTME: LLM provider factory — creates the right client based on config.
// ABOUTME: Supports gemini (hosted, needs an API key) and echo (offline).

use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::llm::client::{ChatModel, ModelError};
use crate::llm::echo::EchoModel;
use crate::llm::gemini::{GeminiClient, GeminiConfig};

/// Create an LLM client based on the provider name in config.
pub fn create_client(config: &LlmConfig) -> anyhow::Result<Arc<dyn ChatModel>> {
    match config.provider.as_str() {
        "gemini" => {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .ok_or_else(|| ModelError::MissingApiKey(config.api_key_env.clone()))?;
            let client = GeminiClient::new(GeminiConfig {
                base_url: config.base_url.clone(),
                model: config.model.clone(),
                api_key,
                timeout: Duration::from_secs(config.timeout_seconds),
            })?;
            Ok(Arc::new(client))
        }
        "echo" => Ok(Arc::new(EchoModel)),
        other => anyhow::bail!(
            "Unknown LLM provider: '{}'. Expected: gemini, echo",
            other
        ),
    }
}
