//! Provider Registry - 按名称构建 Provider 与 Provider 链

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    AnthropicProvider, AnthropicProviderConfig, FakeExtractionProvider, HuggingFaceProvider,
    HuggingFaceProviderConfig, OpenAiProvider, OpenAiProviderConfig,
};
use crate::application::extraction::{ProviderChain, ProviderChainConfig};
use crate::application::ports::{ExtractionProviderPort, ProviderError};

/// 可配置的 Provider 名称
pub const KNOWN_PROVIDERS: &[&str] = &["huggingface", "anthropic", "openai", "fake"];

/// Provider Registry
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    pub huggingface: HuggingFaceProviderConfig,
    pub anthropic: AnthropicProviderConfig,
    pub openai: OpenAiProviderConfig,
}

impl ProviderRegistry {
    pub fn new(
        huggingface: HuggingFaceProviderConfig,
        anthropic: AnthropicProviderConfig,
        openai: OpenAiProviderConfig,
    ) -> Self {
        Self {
            huggingface,
            anthropic,
            openai,
        }
    }

    /// 构建单个 Provider
    pub fn build(&self, name: &str) -> Result<Arc<dyn ExtractionProviderPort>, ProviderError> {
        let provider: Arc<dyn ExtractionProviderPort> = match name {
            "huggingface" => Arc::new(HuggingFaceProvider::new(self.huggingface.clone())?),
            "anthropic" => Arc::new(AnthropicProvider::new(self.anthropic.clone())?),
            "openai" => Arc::new(OpenAiProvider::new(self.openai.clone())?),
            "fake" => Arc::new(FakeExtractionProvider::offline()),
            other => {
                return Err(ProviderError::Unavailable(format!(
                    "Unknown provider: {}",
                    other
                )))
            }
        };
        Ok(provider)
    }

    /// 构建 Provider 链，同名 Provider 在两条链之间共享同一实例
    pub fn build_chain(
        &self,
        summary: &[String],
        characters: &[String],
        config: ProviderChainConfig,
    ) -> Result<ProviderChain, ProviderError> {
        let mut built: HashMap<String, Arc<dyn ExtractionProviderPort>> = HashMap::new();
        let mut resolve = |names: &[String]| -> Result<Vec<Arc<dyn ExtractionProviderPort>>, ProviderError> {
            names
                .iter()
                .map(|name| {
                    if let Some(existing) = built.get(name) {
                        return Ok(existing.clone());
                    }
                    let provider = self.build(name)?;
                    built.insert(name.clone(), provider.clone());
                    Ok(provider)
                })
                .collect()
        };

        let summary_providers = resolve(summary)?;
        let character_providers = resolve(characters)?;

        tracing::info!(
            summary = ?summary,
            characters = ?characters,
            accept_empty_characters = config.accept_empty_characters,
            "Provider chains built"
        );

        Ok(ProviderChain::new(
            summary_providers,
            character_providers,
            config,
        ))
    }
}
