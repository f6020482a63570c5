//! Hugging Face Provider - 调用 Inference API
//!
//! POST {base_url}/models/{model} (Bearer)
//! Request: {"inputs": "..."}
//! - 人物: 命名实体识别模型，返回实体数组
//! - 摘要: 摘要模型，返回 [{"summary_text": "..."}]

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::parsing::{normalize_ner_entities, normalize_summary_output};
use crate::application::ports::{ExtractionProviderPort, ProviderError, NER_INPUT_CHARS};
use crate::domain::artifact::{ArtifactKind, ArtifactPayload};

/// Hugging Face Provider 配置
#[derive(Debug, Clone)]
pub struct HuggingFaceProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// 命名实体识别模型
    pub ner_model: String,
    /// 摘要模型
    pub summary_model: String,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            api_key: None,
            ner_model: "dslim/bert-base-NER".to_string(),
            summary_model: "sshleifer/distilbart-cnn-6-6".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Hugging Face Provider
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceProviderConfig,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn infer(&self, model: &str, inputs: &str) -> Result<Value, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ProviderError::Unavailable("HUGGING_FACE_API_KEY is not set".to_string())
            })?;

        let url = self.model_url(model);
        tracing::debug!(url = %url, input_chars = inputs.chars().count(), "Sending Hugging Face request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&InferenceRequest { inputs })
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

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ExtractionProviderPort for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn supports(&self, _kind: ArtifactKind) -> bool {
        true
    }

    fn input_limit(&self) -> usize {
        NER_INPUT_CHARS
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
            ArtifactKind::Characters => {
                let body = self.infer(&self.config.ner_model, content).await?;
                let characters = normalize_ner_entities(&body)?;
                tracing::debug!(count = characters.len(), "Hugging Face identified characters");
                Ok(ArtifactPayload::characters(characters))
            }
            ArtifactKind::Summary => {
                let body = self.infer(&self.config.summary_model, content).await?;
                Ok(ArtifactPayload::summary(normalize_summary_output(&body)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let provider = HuggingFaceProvider::new(HuggingFaceProviderConfig::default()).unwrap();
        let err = provider
            .try_extract(ArtifactKind::Characters, "Mr. Bennet")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn test_model_url() {
        let provider = HuggingFaceProvider::new(HuggingFaceProviderConfig::default()).unwrap();
        assert_eq!(
            provider.model_url("dslim/bert-base-NER"),
            "https://api-inference.huggingface.co/models/dslim/bert-base-NER"
        );
        assert_eq!(provider.input_limit(), NER_INPUT_CHARS);
        assert_eq!(provider.timeout(), Duration::from_secs(15));
    }
}
