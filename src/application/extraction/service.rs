//! Extraction Service - 按位置获取或生成产物
//!
//! 流程: 缓存查找 → 解析可读内容 → Provider 链 → 写入缓存
//!
//! 对调用方永远不返回错误：内容缺失或 Provider 全部失败时返回占位产物

use std::sync::Arc;

use super::{Extraction, ExtractionCache, PositionResolver, ProviderChain};
use crate::domain::artifact::{Artifact, ArtifactKind, PlaceholderReason};
use crate::domain::book::{BookId, Position};

/// 产物来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSource {
    /// 命中缓存
    Cached,
    /// 新提取并写入缓存
    Extracted,
    /// 占位内容（未写入缓存）
    Placeholder(PlaceholderReason),
}

impl ArtifactSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactSource::Cached => "cached",
            ArtifactSource::Extracted => "extracted",
            ArtifactSource::Placeholder(reason) => reason.as_str(),
        }
    }
}

/// 查询结果
#[derive(Debug, Clone)]
pub struct ArtifactView {
    pub artifact: Artifact,
    pub source: ArtifactSource,
}

/// 预生成单个位置的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PregenerateOutcome {
    /// 该位置已有产物
    AlreadyCached,
    /// 该位置之前没有可读内容
    NoContent,
    /// 成功生成并写入
    Stored,
    /// Provider 全部失败
    Exhausted,
}

/// Extraction Service
pub struct ExtractionService {
    cache: ExtractionCache,
    resolver: PositionResolver,
    chain: Arc<ProviderChain>,
}

impl ExtractionService {
    pub fn new(cache: ExtractionCache, resolver: PositionResolver, chain: Arc<ProviderChain>) -> Self {
        Self {
            cache,
            resolver,
            chain,
        }
    }

    /// 获取不超过 `position` 的产物，缓存未命中时生成
    pub async fn get_or_extract(
        &self,
        book_id: BookId,
        position: Position,
        kind: ArtifactKind,
        preferred_provider: Option<&str>,
    ) -> ArtifactView {
        match self.cache.get(&book_id, position, kind).await {
            Ok(Some(artifact)) => {
                return ArtifactView {
                    artifact,
                    source: ArtifactSource::Cached,
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    book_id = %book_id,
                    kind = %kind,
                    error = %e,
                    "Artifact lookup failed, treating as miss"
                );
            }
        }

        let content = match self.resolver.resolve(*book_id.as_uuid(), position).await {
            Ok(content) if content.found => content,
            Ok(_) => return Self::placeholder(book_id, position, kind, PlaceholderReason::NoContent),
            Err(e) => {
                if e.is_not_found() {
                    tracing::info!(book_id = %book_id, "Book not found, returning placeholder");
                } else {
                    tracing::warn!(book_id = %book_id, error = %e, "Failed to resolve content");
                }
                return Self::placeholder(book_id, position, kind, PlaceholderReason::NoContent);
            }
        };

        match self.chain.extract(kind, &content.text, preferred_provider).await {
            Extraction::Extracted {
                payload,
                provider,
                input_hash,
            } => {
                let artifact = Artifact::new(book_id, position, payload, provider, input_hash);
                ArtifactView {
                    artifact: self.cache.put(artifact).await,
                    source: ArtifactSource::Extracted,
                }
            }
            Extraction::Exhausted { .. } => {
                Self::placeholder(book_id, position, kind, PlaceholderReason::Exhausted)
            }
        }
    }

    /// 预生成 `position` 处的产物
    ///
    /// 只有恰好位于该位置的产物才算已存在
    pub async fn pregenerate_at(
        &self,
        book_id: BookId,
        position: Position,
        kind: ArtifactKind,
    ) -> PregenerateOutcome {
        match self.cache.get(&book_id, position, kind).await {
            Ok(Some(existing)) if existing.position() == position => {
                return PregenerateOutcome::AlreadyCached;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    book_id = %book_id,
                    kind = %kind,
                    position = %position,
                    error = %e,
                    "Artifact lookup failed, treating as miss"
                );
            }
        }

        let content = match self.resolver.resolve(*book_id.as_uuid(), position).await {
            Ok(content) if content.found => content,
            Ok(_) => return PregenerateOutcome::NoContent,
            Err(e) => {
                tracing::warn!(book_id = %book_id, position = %position, error = %e, "Failed to resolve content");
                return PregenerateOutcome::NoContent;
            }
        };

        match self.chain.extract(kind, &content.text, None).await {
            Extraction::Extracted {
                payload,
                provider,
                input_hash,
            } => {
                self.cache
                    .put(Artifact::new(book_id, position, payload, provider, input_hash))
                    .await;
                PregenerateOutcome::Stored
            }
            Extraction::Exhausted { .. } => PregenerateOutcome::Exhausted,
        }
    }

    fn placeholder(
        book_id: BookId,
        position: Position,
        kind: ArtifactKind,
        reason: PlaceholderReason,
    ) -> ArtifactView {
        ArtifactView {
            artifact: Artifact::placeholder(book_id, position, kind, reason),
            source: ArtifactSource::Placeholder(reason),
        }
    }
}
