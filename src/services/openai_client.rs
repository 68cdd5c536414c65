use async_openai::{config::OpenAIConfig, types::CreateCompletionRequestArgs, Client};
use async_trait::async_trait;

use crate::configuration::CompletionSettings;

use super::{CompletionError, CompletionProvider};

const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_MAX_TOKENS: u32 = 150;
const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        CompletionOptions {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl From<&CompletionSettings> for CompletionOptions {
    fn from(settings: &CompletionSettings) -> Self {
        CompletionOptions {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    options: CompletionOptions,
}

impl OpenaiClient {
    pub fn new(api_key: String, options: CompletionOptions) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient::with_config(config, options)
    }

    pub fn with_config(config: OpenAIConfig, options: CompletionOptions) -> Self {
        OpenaiClient {
            client: Client::with_config(config),
            options,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenaiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CreateCompletionRequestArgs::default()
            .model(self.options.model.as_str())
            .prompt(prompt)
            .max_tokens(self.options.max_tokens)
            .temperature(self.options.temperature)
            .build()?;

        let response = self.client.completions().create(request).await?;
        log::info!(
            "Completion {} returned {} choices",
            response.id,
            response.choices.len()
        );

        let first_choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        Ok(first_choice.text)
    }
}
