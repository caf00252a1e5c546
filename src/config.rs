use std::env;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "openrouter", "deepseek"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown provider: {0}. Supported providers: openai, openrouter, deepseek")]
    UnknownProvider(String),
    #[error("Invalid API URL for {provider}: {reason}")]
    InvalidUrl { provider: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub models: Vec<String>,
    pub api_url: String,
    pub temperature: f32,
    pub max_tokens: u16,
}

impl ProviderConfig {
    pub fn from_env(provider: &str) -> Result<Self, ConfigError> {
        if !SUPPORTED_PROVIDERS.contains(&provider) {
            return Err(ConfigError::UnknownProvider(provider.to_string()));
        }
        let prefix = provider.to_uppercase();

        // Get models from env or use defaults
        let models = env::var(format!("{}_MODELS", prefix))
            .map(|m| m.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_else(|_| match provider {
                "openrouter" => vec![
                    "openai/gpt-4o-mini".to_string(),
                    "anthropic/claude-3-haiku".to_string(),
                ],
                "deepseek" => vec![
                    "deepseek-chat".to_string(),
                ],
                _ => vec![
                    "gpt-4o-mini".to_string(),
                    "gpt-4o".to_string(),
                ],
            });

        // Get API URL from env or use default
        let api_url = env::var(format!("{}_API_URL", prefix))
            .unwrap_or_else(|_| match provider {
                "openrouter" => "https://openrouter.ai/api/v1/chat/completions".to_string(),
                "deepseek" => "https://api.deepseek.com/v1/chat/completions".to_string(),
                _ => "https://api.openai.com/v1/chat/completions".to_string(),
            });

        Url::parse(&api_url).map_err(|e| ConfigError::InvalidUrl {
            provider: provider.to_string(),
            reason: e.to_string(),
        })?;

        let temperature = env::var(format!("{}_TEMPERATURE", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.7);

        let max_tokens = env::var(format!("{}_MAX_TOKENS", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(4000);

        Ok(Self {
            models,
            api_url,
            temperature,
            max_tokens,
        })
    }

    pub fn primary_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or("gpt-4o-mini")
    }
}

/// Application-wide settings, resolved from the environment and then
/// overridden by command-line flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub quiz_dir: PathBuf,
    pub provider: String,
    pub api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let provider = env::var("PLAN_MY_DIETARY_PROVIDER")
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|_| "openai".to_string());

        let api_key = Self::api_key_for(&provider);

        Self {
            data_dir: env::var("PLAN_MY_DIETARY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            quiz_dir: env::var("PLAN_MY_DIETARY_QUIZ_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("quizzes")),
            provider,
            api_key,
        }
    }

    pub fn api_key_for(provider: &str) -> Option<String> {
        env::var(format!("{}_API_KEY", provider.to_uppercase()))
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("plan_my_dietary.db")
    }
}
