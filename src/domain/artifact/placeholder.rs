//! Artifact Context - 固定占位内容
//!
//! 占位产物只返回给调用方，不写入缓存

use super::{ArtifactKind, ArtifactPayload, CharacterEntry};

/// 尚无可读内容时的摘要
pub const NO_CONTENT_SUMMARY: &str = "No summary available for this position yet.";

/// 所有 Provider 均失败时的摘要
pub const EXHAUSTED_SUMMARY: &str =
    "Summary unavailable: no provider could summarize the book up to this position.";

/// 占位原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    /// 书籍不存在，或当前位置之前没有读完的 Section
    NoContent,
    /// Provider 链全部失败
    Exhausted,
}

impl PlaceholderReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderReason::NoContent => "no_content",
            PlaceholderReason::Exhausted => "exhausted",
        }
    }
}

/// 生成占位内容
pub fn placeholder_payload(kind: ArtifactKind, reason: PlaceholderReason) -> ArtifactPayload {
    match (kind, reason) {
        (ArtifactKind::Summary, PlaceholderReason::NoContent) => {
            ArtifactPayload::summary(NO_CONTENT_SUMMARY)
        }
        (ArtifactKind::Summary, PlaceholderReason::Exhausted) => {
            ArtifactPayload::summary(EXHAUSTED_SUMMARY)
        }
        (ArtifactKind::Characters, PlaceholderReason::NoContent) => {
            ArtifactPayload::characters(vec![CharacterEntry::new(
                "Unknown",
                "No characters could be identified at your current reading position.",
            )])
        }
        (ArtifactKind::Characters, PlaceholderReason::Exhausted) => {
            ArtifactPayload::characters(vec![
                CharacterEntry::new("Main Character", "The protagonist of the story."),
                CharacterEntry::new(
                    "Supporting Character",
                    "A key supporting character in the narrative.",
                ),
            ])
        }
    }
}
