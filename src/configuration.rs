use std::time::Duration;

use serde_aux::field_attributes::deserialize_number_from_string;

use crate::services::RetryPolicy;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub api_keys: ApiKeySettings,
    pub search: SearchSettings,
    pub completion: CompletionSettings,
    pub google: GoogleSettings,
    pub dashboard: DashboardSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApiKeySettings {
    pub openai: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub num_results: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_attempts: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub retry_delay_secs: u64,
}

impl SearchSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct CompletionSettings {
    pub model: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_tokens: u32,
    pub temperature: f32,
    /// Instruction placed in front of the snippets, `{entity}` is substituted.
    pub instruction: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct GoogleSettings {
    pub credentials_path: Option<String>,
    pub sheets_base_url: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DashboardSettings {
    pub default_prompt: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub preview_rows: usize,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    _ = dotenvy::dotenv();

    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("api_keys.openai", std::env::var("OPENAI_API_KEY").ok())?
        .set_override_option(
            "google.credentials_path",
            std::env::var("GOOGLE_CREDENTIALS_PATH").ok(),
        )?
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
