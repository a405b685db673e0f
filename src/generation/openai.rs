//! OpenAI chat-completions generator.

use super::Generator;
use crate::config::GenerationSettings;
use crate::error::{RagError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator backed by an OpenAI-compatible chat completions endpoint.
///
/// The rendered prompt is sent as a single user message, so the template
/// carries all instructions.
pub struct OpenAIGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl OpenAIGenerator {
    /// Create a new generator from an existing client and generation settings.
    pub fn new(client: Client<OpenAIConfig>, settings: &GenerationSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            max_new_tokens: settings.max_new_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
        }
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| RagError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(self.max_new_tokens)
            .temperature(self.temperature)
            .top_p(self.top_p)
            .build()
            .map_err(|e| RagError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            RagError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| RagError::Generation("Empty response from model".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAISettings;
    use crate::openai::create_client_with;

    #[test]
    fn test_generator_uses_settings() {
        let client = create_client_with(&OpenAISettings::default()).unwrap();
        let settings = GenerationSettings {
            model: "tinyllama".to_string(),
            max_new_tokens: 64,
            temperature: 0.2,
            top_p: 0.5,
        };
        let generator = OpenAIGenerator::new(client, &settings);
        assert_eq!(generator.model(), "tinyllama");
        assert_eq!(generator.max_new_tokens, 64);
    }
}
