//! OpenAI Provider - 调用 Chat Completions API
//!
//! POST {base_url}/v1/chat/completions (Bearer)
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::parsing::parse_character_json;
use super::prompts::{characters_prompt, summary_prompt, CHARACTERS_SYSTEM, SUMMARY_SYSTEM};
use crate::application::ports::{ExtractionProviderPort, ProviderError, LLM_INPUT_CHARS};
use crate::domain::artifact::{ArtifactKind, ArtifactPayload};

/// OpenAI Provider 配置
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI Provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn complete(
        &self,
        system: &str,
        prompt: String,
        json_mode: bool,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::Unavailable("OPENAI_API_KEY is not set".to_string()))?;

        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ]
        });
        if json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }

        tracing::debug!(url = %self.completions_url(), model = %self.config.model, "Sending OpenAI request");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("No message content in response".to_string()))
    }
}

#[async_trait]
impl ExtractionProviderPort for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn supports(&self, _kind: ArtifactKind) -> bool {
        true
    }

    fn input_limit(&self) -> usize {
        LLM_INPUT_CHARS
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    async fn try_extract(
        &self,
        kind: ArtifactKind,
        content: &str,
    ) -> Result<ArtifactPayload, ProviderError> {
        match kind {
            ArtifactKind::Summary => {
                let text = self
                    .complete(SUMMARY_SYSTEM, summary_prompt(content), false)
                    .await?;
                Ok(ArtifactPayload::summary(text.trim()))
            }
            ArtifactKind::Characters => {
                let text = self
                    .complete(CHARACTERS_SYSTEM, characters_prompt(content), true)
                    .await?;
                Ok(ArtifactPayload::characters(parse_character_json(&text)?))
            }
        }
    }
}
