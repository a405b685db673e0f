//! OpenAI client construction shared by the embedder and the generator.

use crate::config::OpenAISettings;
use crate::error::{RagError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client from settings.
///
/// A custom `base_url` lets the service talk to any OpenAI-compatible
/// server (vLLM, Ollama, text-generation-inference) instead of api.openai.com.
pub fn create_client_with(settings: &OpenAISettings) -> Result<Client<OpenAIConfig>> {
    if settings.timeout_seconds == 0 {
        return Err(RagError::Config("openai.timeout_seconds must be positive".to_string()));
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()?;

    let mut config = OpenAIConfig::default();
    if let Some(base_url) = settings.base_url.as_deref().filter(|u| !u.is_empty()) {
        config = config.with_api_base(base_url);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
