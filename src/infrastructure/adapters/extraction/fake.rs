//! Fake Extraction Provider - 离线 / 测试用的 Provider
//!
//! 不调用任何外部服务：
//! - Offline: 从文本本身确定性地生成摘要和人物
//! - Fixed / Fail / Hang: 测试脚本化行为，并记录收到的输入

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::parsing::{truncate_words, NER_CHARACTER_DESCRIPTION};
use crate::application::ports::{
    ExtractionProviderPort, ProviderError, DEFAULT_PROVIDER_TIMEOUT_SECS, LLM_INPUT_CHARS,
};
use crate::domain::artifact::{ArtifactKind, ArtifactPayload, CharacterEntry};

/// 离线摘要保留的词数
const OFFLINE_SUMMARY_WORDS: usize = 60;

/// 离线人物提取最多保留的人数
const OFFLINE_MAX_CHARACTERS: usize = 5;

/// 常见的句首大写词，不视为人名
const NON_NAMES: &[&str] = &[
    "A", "An", "And", "As", "At", "But", "Chapter", "For", "He", "Her", "His", "I", "If", "In",
    "It", "Mr", "Mrs", "Miss", "My", "No", "Not", "Of", "On", "She", "So", "That", "The",
    "Then", "There", "They", "This", "To", "We", "What", "When", "You",
];

/// Fake 行为
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// 根据输入文本确定性生成
    Offline,
    /// 始终返回固定内容
    Fixed(ArtifactPayload),
    /// 始终失败
    Fail(String),
    /// 永不返回（用于超时测试）
    Hang,
}

/// Fake Extraction Provider
pub struct FakeExtractionProvider {
    name: String,
    behavior: FakeBehavior,
    kinds: Vec<ArtifactKind>,
    input_limit: usize,
    timeout: Duration,
    inputs: Mutex<Vec<String>>,
}

impl FakeExtractionProvider {
    pub fn new(name: impl Into<String>, behavior: FakeBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            kinds: vec![ArtifactKind::Summary, ArtifactKind::Characters],
            input_limit: LLM_INPUT_CHARS,
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// 离线 Provider（配置名 `fake`）
    pub fn offline() -> Self {
        Self::new("fake", FakeBehavior::Offline)
    }

    pub fn with_input_limit(mut self, chars: usize) -> Self {
        self.input_limit = chars;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn supporting(mut self, kinds: &[ArtifactKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    /// 收到的所有输入（按调用顺序）
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .map(|inputs| inputs.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.inputs.lock().map(|inputs| inputs.len()).unwrap_or(0)
    }

    fn record(&self, content: &str) {
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(content.to_string());
        }
    }
}

/// 离线摘要: 文本开头的若干词
fn offline_summary(content: &str) -> String {
    format!(
        "So far: {}",
        truncate_words(content.trim(), OFFLINE_SUMMARY_WORDS)
    )
}

/// 离线人物: 出现至少两次的大写词，按出现次数降序、首次出现顺序排列
fn offline_characters(content: &str) -> Vec<CharacterEntry> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (order, raw) in content.split_whitespace().enumerate() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let mut chars = word.chars();
        let capitalized = chars.next().is_some_and(char::is_uppercase)
            && chars.clone().next().is_some()
            && chars.all(char::is_alphabetic);
        if !capitalized || NON_NAMES.contains(&word) {
            continue;
        }
        counts.entry(word).or_insert((0, order)).0 += 1;
    }

    let mut names: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= 2)
        .map(|(name, (count, first))| (name, count, first))
        .collect();
    names.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    names
        .into_iter()
        .take(OFFLINE_MAX_CHARACTERS)
        .map(|(name, _, _)| CharacterEntry::new(name, NER_CHARACTER_DESCRIPTION))
        .collect()
}

#[async_trait]
impl ExtractionProviderPort for FakeExtractionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, kind: ArtifactKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn input_limit(&self) -> usize {
        self.input_limit
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn try_extract(
        &self,
        kind: ArtifactKind,
        content: &str,
    ) -> Result<ArtifactPayload, ProviderError> {
        self.record(content);

        match &self.behavior {
            FakeBehavior::Offline => Ok(match kind {
                ArtifactKind::Summary => ArtifactPayload::summary(offline_summary(content)),
                ArtifactKind::Characters => ArtifactPayload::characters(offline_characters(content)),
            }),
            FakeBehavior::Fixed(payload) => Ok(payload.clone()),
            FakeBehavior::Fail(message) => Err(ProviderError::ServiceError(message.clone())),
            FakeBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(ProviderError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "It is a truth universally acknowledged. Elizabeth laughed. \
        Darcy frowned at Elizabeth. The ball ended and Darcy left. Jane smiled.";

    #[tokio::test]
    async fn test_offline_characters_are_deterministic() {
        let provider = FakeExtractionProvider::offline();

        let first = provider.try_extract(ArtifactKind::Characters, TEXT).await.unwrap();
        let second = provider.try_extract(ArtifactKind::Characters, TEXT).await.unwrap();

        assert_eq!(first, second);
        let ArtifactPayload::Characters { characters } = first else {
            panic!("expected characters");
        };
        let names: Vec<_> = characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Elizabeth", "Darcy"]);
    }

    #[tokio::test]
    async fn test_offline_summary_uses_opening() {
        let provider = FakeExtractionProvider::offline();
        let payload = provider.try_extract(ArtifactKind::Summary, TEXT).await.unwrap();
        assert_eq!(payload, ArtifactPayload::summary(format!("So far: {}", TEXT)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_records_input() {
        let provider = FakeExtractionProvider::new("broken", FakeBehavior::Fail("down".into()));
        let err = provider
            .try_extract(ArtifactKind::Summary, "input")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ServiceError(_)));
        assert_eq!(provider.inputs(), vec!["input".to_string()]);
    }
}
