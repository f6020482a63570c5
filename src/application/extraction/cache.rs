//! Extraction Cache - 按位置的产物缓存

use std::sync::Arc;

use crate::application::ports::{ArtifactStorePort, RepositoryError};
use crate::domain::artifact::{Artifact, ArtifactKind};
use crate::domain::book::{BookId, Position};

/// Extraction Cache
///
/// 查找语义为"最佳前序覆盖"：返回 `stored_position <= position` 中位置最大的产物。
/// 不做去重、加锁、淘汰或过期。
pub struct ExtractionCache {
    store: Arc<dyn ArtifactStorePort>,
}

impl ExtractionCache {
    pub fn new(store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { store }
    }

    /// 查找缓存，`Ok(None)` 表示未命中
    pub async fn get(
        &self,
        book_id: &BookId,
        position: Position,
        kind: ArtifactKind,
    ) -> Result<Option<Artifact>, RepositoryError> {
        let artifact = self.store.find_best_prior(book_id, kind, position).await?;

        match &artifact {
            Some(hit) => tracing::debug!(
                book_id = %book_id,
                kind = %kind,
                position = %position,
                stored_position = %hit.position(),
                "Artifact cache hit"
            ),
            None => tracing::debug!(
                book_id = %book_id,
                kind = %kind,
                position = %position,
                "Artifact cache miss"
            ),
        }

        Ok(artifact)
    }

    /// 写入缓存
    ///
    /// 写入失败只记录日志，产物照常返回给调用方
    pub async fn put(&self, artifact: Artifact) -> Artifact {
        if let Err(e) = self.store.insert(&artifact).await {
            tracing::error!(
                book_id = %artifact.book_id(),
                kind = %artifact.kind(),
                position = %artifact.position(),
                error = %e,
                "Failed to persist artifact, returning it uncached"
            );
        } else {
            tracing::info!(
                book_id = %artifact.book_id(),
                kind = %artifact.kind(),
                position = %artifact.position(),
                provider = %artifact.provider(),
                "Artifact stored"
            );
        }
        artifact
    }
}
