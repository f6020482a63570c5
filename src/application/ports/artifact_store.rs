//! Artifact Store Port - 产物持久化
//!
//! 按 (book_id, kind) 追加写入的日志，读取时选择不超过请求位置的最大位置

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::artifact::{Artifact, ArtifactKind};
use crate::domain::book::{BookId, Position};

/// Artifact Store Port
///
/// - 只追加：写入不会覆盖或删除其他位置的产物
/// - 同一 (book, kind, position) 的重复写入视为无害重复
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 查找 `stored_position <= position` 中位置最大的产物
    async fn find_best_prior(
        &self,
        book_id: &BookId,
        kind: ArtifactKind,
        position: Position,
    ) -> Result<Option<Artifact>, RepositoryError>;

    /// 追加产物
    async fn insert(&self, artifact: &Artifact) -> Result<(), RepositoryError>;
}
