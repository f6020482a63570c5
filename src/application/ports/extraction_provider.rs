//! Extraction Provider Port - 外部 AI 内容提取抽象
//!
//! 定义摘要 / 人物提取的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::artifact::{ArtifactKind, ArtifactPayload};

/// 命名实体识别模型的输入字符上限
pub const NER_INPUT_CHARS: usize = 1024;

/// 大模型 prompt 的输入字符上限
pub const LLM_INPUT_CHARS: usize = 4000;

/// 默认单次调用超时（秒）
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Provider 错误
///
/// 任何错误都只会让 Provider 链继续尝试下一个 Provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 缺少凭据等，Provider 当前不可用
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    /// 输出无法规范化为产物结构
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// 从 reqwest 错误转换
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::NetworkError(format!("Cannot connect to provider: {}", err))
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

/// Extraction Provider Port
///
/// 每个实现包装一个外部 AI 服务，输出统一规范化为 [`ArtifactPayload`]
#[async_trait]
pub trait ExtractionProviderPort: Send + Sync {
    /// Provider 名称（用于配置、日志和持久化）
    fn name(&self) -> &str;

    /// 是否支持该产物类型
    fn supports(&self, kind: ArtifactKind) -> bool;

    /// 输入字符上限，调用方会按此截断内容前缀
    fn input_limit(&self) -> usize {
        LLM_INPUT_CHARS
    }

    /// 单次调用超时
    fn timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS)
    }

    /// 执行提取
    async fn try_extract(
        &self,
        kind: ArtifactKind,
        content: &str,
    ) -> Result<ArtifactPayload, ProviderError>;
}
