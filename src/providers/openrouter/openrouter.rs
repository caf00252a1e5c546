use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::config::ProviderConfig;
use crate::providers::traits::CompletionProvider;
use reqwest::Client;
use serde_json::{json, Value};

/// Any endpoint speaking the OpenAI chat-completions JSON shape
/// (OpenRouter, DeepSeek).
#[derive(Clone)]
pub struct OpenRouterProvider {
    api_key: String,
    client: Client,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u16,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, config: &ProviderConfig) -> Self {
        Self {
            api_key,
            client: Client::new(),
            api_url: config.api_url.clone(),
            model: config.primary_model().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn request_body(&self, system_prompt: &str, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature
        })
    }
}

pub fn extract_content(response_json: &Value) -> Result<String> {
    // Check for API-level errors
    if let Some(error) = response_json.get("error") {
        return Err(anyhow!("API returned error: {}", error));
    }

    response_json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("No response content received"))
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        let response = self.client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "Plan My Dietary")
            .json(&self.request_body(system_prompt, prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("API request failed: Status {}, Body: {}", status, error_text));
        }

        let response_json: Value = response.json().await?;
        extract_content(&response_json)
    }

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(self.clone())
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(self.model.clone())
    }
}
