pub mod openai;
pub mod openrouter;
pub mod traits;

use anyhow::Result;
use log::info;

use crate::config::ProviderConfig;
use openai::openai::OpenAIProvider;
use openrouter::openrouter::OpenRouterProvider;
use traits::CompletionProvider;

/// Build the configured provider. Without an API key there is no provider
/// and the assistant answers with its local fallback.
pub fn create_provider(
    provider: &str,
    api_key: Option<String>,
) -> Result<Option<Box<dyn CompletionProvider + Send + Sync>>> {
    let Some(api_key) = api_key else {
        info!("No API key configured for {}, using local responses", provider);
        return Ok(None);
    };

    let config = ProviderConfig::from_env(provider)?;
    let provider: Box<dyn CompletionProvider + Send + Sync> = match provider {
        "openai" => Box::new(OpenAIProvider::new(api_key, &config)),
        _ => Box::new(OpenRouterProvider::new(api_key, &config)),
    };

    Ok(Some(provider))
}
