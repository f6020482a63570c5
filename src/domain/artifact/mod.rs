//! Artifact Context - 产物限界上下文
//!
//! 职责:
//! - 按阅读位置缓存的摘要 / 人物列表
//! - 固定占位内容

mod aggregate;
mod placeholder;
mod value_objects;

pub use aggregate::{Artifact, PLACEHOLDER_PROVIDER};
pub use placeholder::{
    placeholder_payload, PlaceholderReason, EXHAUSTED_SUMMARY, NO_CONTENT_SUMMARY,
};
pub use value_objects::{ArtifactKind, ArtifactPayload, CharacterEntry};
