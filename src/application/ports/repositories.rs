//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::book::Position;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Book Repository
// ============================================================================

/// 书籍实体（用于持久化）
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub is_public_domain: bool,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Section 实体（用于持久化）
#[derive(Debug, Clone)]
pub struct SectionRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub index: usize,
    pub title: String,
    pub content: String,
    pub start_position: Position,
    pub end_position: Position,
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 保存书籍
    async fn save(&self, book: &BookRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找书籍
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepositoryError>;

    /// 书籍是否存在
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// 获取所有书籍
    async fn find_all(&self) -> Result<Vec<BookRecord>, RepositoryError>;

    /// 批量保存 Section（单个事务）
    async fn save_sections(&self, sections: &[SectionRecord]) -> Result<(), RepositoryError>;

    /// 分页获取 Section
    async fn find_sections_paginated(
        &self,
        book_id: Uuid,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SectionRecord>, RepositoryError>;

    /// 获取 `end_position <= position` 的所有 Section，按 index 升序
    async fn find_sections_read_by(
        &self,
        book_id: Uuid,
        position: Position,
    ) -> Result<Vec<SectionRecord>, RepositoryError>;

    /// Section 数量
    async fn count_sections(&self, book_id: Uuid) -> Result<usize, RepositoryError>;

    /// 全书总词数（最后一个 Section 的结束位置，无 Section 时为 0）
    async fn total_words(&self, book_id: Uuid) -> Result<Position, RepositoryError>;
}

// ============================================================================
// Reading State Repository
// ============================================================================

/// 阅读状态实体（每个 user + book 一条）
#[derive(Debug, Clone)]
pub struct ReadingStateRecord {
    pub user_id: String,
    pub book_id: Uuid,
    pub position: Position,
    /// 阅读进度百分比 (0-100)
    pub progress: u8,
    pub last_read_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reading State Repository Port
#[async_trait]
pub trait ReadingStateRepositoryPort: Send + Sync {
    /// 插入或更新阅读状态（保留首次 created_at）
    async fn upsert(&self, state: &ReadingStateRecord) -> Result<ReadingStateRecord, RepositoryError>;

    /// 查找阅读状态
    async fn find(
        &self,
        user_id: &str,
        book_id: Uuid,
    ) -> Result<Option<ReadingStateRecord>, RepositoryError>;
}
