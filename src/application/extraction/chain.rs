//! Provider Chain - 按顺序尝试多个提取 Provider
//!
//! 第一个成功的结果胜出；全部失败时返回固定占位内容

use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::ExtractionProviderPort;
use crate::domain::artifact::{placeholder_payload, ArtifactKind, ArtifactPayload, PlaceholderReason};
use crate::domain::{input_fingerprint, truncate_chars};

/// Provider 链配置
#[derive(Debug, Clone, Default)]
pub struct ProviderChainConfig {
    /// 是否把空人物列表视为成功
    pub accept_empty_characters: bool,
}

/// 提取结果
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// 某个 Provider 成功
    Extracted {
        payload: ArtifactPayload,
        provider: String,
        /// 截断后输入的指纹
        input_hash: String,
    },
    /// 所有 Provider 均失败，附带固定占位内容
    Exhausted { placeholder: ArtifactPayload },
}

impl Extraction {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Extraction::Exhausted { .. })
    }

    pub fn payload(&self) -> &ArtifactPayload {
        match self {
            Extraction::Extracted { payload, .. } => payload,
            Extraction::Exhausted { placeholder } => placeholder,
        }
    }
}

/// Provider Chain
///
/// 摘要与人物列表各自持有有序的 Provider 列表
pub struct ProviderChain {
    summary_providers: Vec<Arc<dyn ExtractionProviderPort>>,
    character_providers: Vec<Arc<dyn ExtractionProviderPort>>,
    config: ProviderChainConfig,
}

impl ProviderChain {
    pub fn new(
        summary_providers: Vec<Arc<dyn ExtractionProviderPort>>,
        character_providers: Vec<Arc<dyn ExtractionProviderPort>>,
        config: ProviderChainConfig,
    ) -> Self {
        Self {
            summary_providers,
            character_providers,
            config,
        }
    }

    /// 某类产物的 Provider 名称（按尝试顺序）
    pub fn provider_names(&self, kind: ArtifactKind) -> Vec<String> {
        self.providers_for(kind)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    fn providers_for(&self, kind: ArtifactKind) -> &[Arc<dyn ExtractionProviderPort>] {
        match kind {
            ArtifactKind::Summary => &self.summary_providers,
            ArtifactKind::Characters => &self.character_providers,
        }
    }

    /// 计算尝试顺序，`preferred` 命中时移到最前，其余保持原顺序
    fn ordered(
        &self,
        kind: ArtifactKind,
        preferred: Option<&str>,
    ) -> Vec<Arc<dyn ExtractionProviderPort>> {
        let mut providers = self.providers_for(kind).to_vec();

        if let Some(name) = preferred {
            match providers.iter().position(|p| p.name() == name) {
                Some(idx) => {
                    let first = providers.remove(idx);
                    providers.insert(0, first);
                }
                None => tracing::warn!(
                    kind = %kind,
                    provider = %name,
                    "Preferred provider not configured, using default order"
                ),
            }
        }

        providers
    }

    fn accepts(&self, kind: ArtifactKind, payload: &ArtifactPayload) -> bool {
        if payload.kind() != kind {
            return false;
        }
        match kind {
            ArtifactKind::Characters if payload.is_empty() => self.config.accept_empty_characters,
            _ => !payload.is_empty(),
        }
    }

    /// 依次尝试 Provider
    ///
    /// 每个 Provider 收到的是 `content` 按其输入上限截断后的字符前缀，
    /// 调用受其超时限制。任何错误、超时或不可接受的结果都只会继续下一个。
    pub async fn extract(
        &self,
        kind: ArtifactKind,
        content: &str,
        preferred: Option<&str>,
    ) -> Extraction {
        let providers = self.ordered(kind, preferred);
        if providers.is_empty() {
            tracing::warn!(kind = %kind, "No providers configured");
        }

        for provider in providers {
            let name = provider.name().to_string();

            if !provider.supports(kind) {
                tracing::debug!(kind = %kind, provider = %name, "Provider does not support kind, skipping");
                continue;
            }

            let input = truncate_chars(content, provider.input_limit());
            let started = Instant::now();

            tracing::debug!(
                kind = %kind,
                provider = %name,
                input_chars = input.chars().count(),
                "Trying provider"
            );

            let result =
                tokio::time::timeout(provider.timeout(), provider.try_extract(kind, input)).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(Ok(payload)) if self.accepts(kind, &payload) => {
                    tracing::info!(kind = %kind, provider = %name, elapsed_ms, "Provider succeeded");
                    return Extraction::Extracted {
                        payload,
                        provider: name,
                        input_hash: input_fingerprint(input),
                    };
                }
                Ok(Ok(_)) => {
                    tracing::warn!(kind = %kind, provider = %name, elapsed_ms, "Provider returned unusable result");
                }
                Ok(Err(e)) => {
                    tracing::warn!(kind = %kind, provider = %name, elapsed_ms, error = %e, "Provider failed");
                }
                Err(_) => {
                    tracing::warn!(
                        kind = %kind,
                        provider = %name,
                        timeout_ms = provider.timeout().as_millis() as u64,
                        "Provider timed out"
                    );
                }
            }
        }

        tracing::error!(kind = %kind, "All providers exhausted, using placeholder");
        Extraction::Exhausted {
            placeholder: placeholder_payload(kind, PlaceholderReason::Exhausted),
        }
    }
}
