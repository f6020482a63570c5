//! Anthropic Provider - 调用 Messages API
//!
//! POST {base_url}/v1/messages
//! Headers: x-api-key, anthropic-version
//! Response: {"content": [{"type": "text", "text": "..."}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::parsing::parse_character_json;
use super::prompts::{characters_prompt, summary_prompt, CHARACTERS_SYSTEM, SUMMARY_SYSTEM};
use crate::application::ports::{ExtractionProviderPort, ProviderError, LLM_INPUT_CHARS};
use crate::domain::artifact::{ArtifactKind, ArtifactPayload};

/// Anthropic Provider 配置
#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for AnthropicProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: None,
            model: "claude-3-opus-20240229".to_string(),
            max_tokens: 1000,
            api_version: "2023-06-01".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, system: &str, prompt: String) -> Result<String, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::Unavailable("ANTHROPIC_API_KEY is not set".to_string()))?;

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(url = %self.messages_url(), model = %self.config.model, "Sending Anthropic request");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&request)
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

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        body.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ProviderError::InvalidResponse("No text block in response".to_string()))
    }
}

#[async_trait]
impl ExtractionProviderPort for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
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
                let text = self.complete(SUMMARY_SYSTEM, summary_prompt(content)).await?;
                Ok(ArtifactPayload::summary(text.trim()))
            }
            ArtifactKind::Characters => {
                let text = self
                    .complete(CHARACTERS_SYSTEM, characters_prompt(content))
                    .await?;
                Ok(ArtifactPayload::characters(parse_character_json(&text)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let provider = AnthropicProvider::new(AnthropicProviderConfig::default()).unwrap();
        let err = provider
            .try_extract(ArtifactKind::Summary, "Some content")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn test_messages_url() {
        let provider = AnthropicProvider::new(AnthropicProviderConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.messages_url(), "http://localhost:9000/v1/messages");
    }
}
