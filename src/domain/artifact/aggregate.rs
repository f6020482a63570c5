//! Artifact Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::placeholder::{placeholder_payload, PlaceholderReason};
use super::{ArtifactKind, ArtifactPayload};
use crate::domain::book::{BookId, Position};

/// 占位产物使用的 Provider 名称
pub const PLACEHOLDER_PROVIDER: &str = "placeholder";

/// Artifact 聚合根（摘要或人物列表）
///
/// 不变量:
/// - position 为生成时使用内容的最大阅读位置，产物不包含 position 之后的信息
/// - 人物首次出场位置不超过 position
/// - 创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    id: Uuid,
    book_id: BookId,
    position: Position,
    payload: ArtifactPayload,
    /// 产生该内容的 Provider 名称
    provider: String,
    /// Provider 输入（截断后文本）的 md5 指纹
    input_hash: String,
    created_at: DateTime<Utc>,
}

impl Artifact {
    /// 创建新产物
    pub fn new(
        book_id: BookId,
        position: Position,
        payload: ArtifactPayload,
        provider: impl Into<String>,
        input_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            position,
            payload: payload.bounded_to(position),
            provider: provider.into(),
            input_hash: input_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// 从持久化数据重建
    pub fn restore(
        id: Uuid,
        book_id: BookId,
        position: Position,
        payload: ArtifactPayload,
        provider: String,
        input_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            book_id,
            position,
            payload,
            provider,
            input_hash,
            created_at,
        }
    }

    /// 创建占位产物
    pub fn placeholder(
        book_id: BookId,
        position: Position,
        kind: ArtifactKind,
        reason: PlaceholderReason,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            book_id,
            position,
            payload: placeholder_payload(kind, reason),
            provider: PLACEHOLDER_PROVIDER.to_string(),
            input_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> ArtifactKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &ArtifactPayload {
        &self.payload
    }

    pub fn into_payload(self) -> ArtifactPayload {
        self.payload
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn input_hash(&self) -> &str {
        &self.input_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_nil() && self.provider == PLACEHOLDER_PROVIDER
    }
}
