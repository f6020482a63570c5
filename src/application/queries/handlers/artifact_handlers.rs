//! Artifact Query Handlers - 按阅读位置获取摘要与人物列表
//!
//! 两个查询都不会因为内容缺失或 Provider 失败而报错，而是返回占位内容

use std::sync::Arc;
use uuid::Uuid;

use crate::application::extraction::{ArtifactSource, ArtifactView, ExtractionService};
use crate::application::queries::{GetCharacters, GetSummary};
use crate::domain::artifact::{ArtifactKind, ArtifactPayload, CharacterEntry};
use crate::domain::book::{BookId, Position};

// ============================================================================
// Response DTOs
// ============================================================================

/// 摘要响应
#[derive(Debug, Clone)]
pub struct SummaryResponse {
    /// 占位内容为 nil UUID
    pub id: Uuid,
    pub book_id: Uuid,
    /// 产物位置（命中缓存时可能小于请求位置）
    pub position: Position,
    pub content: String,
    pub provider: String,
    pub source: ArtifactSource,
    pub created_at: String,
}

impl From<ArtifactView> for SummaryResponse {
    fn from(view: ArtifactView) -> Self {
        let artifact = view.artifact;
        let id = artifact.id();
        let book_id = *artifact.book_id().as_uuid();
        let position = artifact.position();
        let provider = artifact.provider().to_string();
        let created_at = artifact.created_at().to_rfc3339();

        let content = match artifact.into_payload() {
            ArtifactPayload::Summary { content } => content,
            ArtifactPayload::Characters { .. } => String::new(),
        };

        Self {
            id,
            book_id,
            position,
            content,
            provider,
            source: view.source,
            created_at,
        }
    }
}

/// 人物列表响应
#[derive(Debug, Clone)]
pub struct CharactersResponse {
    pub book_id: Uuid,
    pub position: Position,
    pub characters: Vec<CharacterEntry>,
    pub provider: String,
    pub source: ArtifactSource,
}

impl From<ArtifactView> for CharactersResponse {
    fn from(view: ArtifactView) -> Self {
        let artifact = view.artifact;
        let book_id = *artifact.book_id().as_uuid();
        let position = artifact.position();
        let provider = artifact.provider().to_string();

        let characters = match artifact.into_payload() {
            ArtifactPayload::Characters { characters } => characters,
            ArtifactPayload::Summary { .. } => Vec::new(),
        };

        Self {
            book_id,
            position,
            characters,
            provider,
            source: view.source,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetSummary Handler
pub struct GetSummaryHandler {
    service: Arc<ExtractionService>,
}

impl GetSummaryHandler {
    pub fn new(service: Arc<ExtractionService>) -> Self {
        Self { service }
    }

    pub async fn handle(&self, query: GetSummary) -> SummaryResponse {
        let view = self
            .service
            .get_or_extract(
                BookId::from_uuid(query.book_id),
                query.position,
                ArtifactKind::Summary,
                None,
            )
            .await;

        tracing::debug!(
            book_id = %query.book_id,
            position = %query.position,
            source = view.source.as_str(),
            "Summary served"
        );

        SummaryResponse::from(view)
    }
}

/// GetCharacters Handler
pub struct GetCharactersHandler {
    service: Arc<ExtractionService>,
}

impl GetCharactersHandler {
    pub fn new(service: Arc<ExtractionService>) -> Self {
        Self { service }
    }

    pub async fn handle(&self, query: GetCharacters) -> CharactersResponse {
        let view = self
            .service
            .get_or_extract(
                BookId::from_uuid(query.book_id),
                query.position,
                ArtifactKind::Characters,
                query.provider.as_deref(),
            )
            .await;

        tracing::debug!(
            book_id = %query.book_id,
            position = %query.position,
            source = view.source.as_str(),
            "Characters served"
        );

        CharactersResponse::from(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::ImportBookHandler;
    use crate::application::commands::ImportBook;
    use crate::application::extraction::{
        ExtractionCache, PositionResolver, ProviderChain, ProviderChainConfig,
    };
    use crate::application::ports::ExtractionProviderPort;
    use crate::domain::artifact::{
        PlaceholderReason, EXHAUSTED_SUMMARY, NO_CONTENT_SUMMARY, PLACEHOLDER_PROVIDER,
    };
    use crate::domain::SectionConfig;
    use crate::infrastructure::adapters::extraction::{FakeBehavior, FakeExtractionProvider};
    use crate::infrastructure::persistence::sqlite::Database;

    struct Fixture {
        _db: Database,
        book_id: Uuid,
        summaries: GetSummaryHandler,
        characters: GetCharactersHandler,
    }

    /// 两个 Section: [0, 500) 和 [500, 1200)
    async fn fixture(
        summary: Arc<FakeExtractionProvider>,
        characters: Arc<FakeExtractionProvider>,
    ) -> Fixture {
        let db = Database::in_memory().await.unwrap();
        let books = db.book_repository();

        let imported = ImportBookHandler::new(books.clone(), SectionConfig::default())
            .handle(ImportBook {
                title: "Pride and Prejudice".to_string(),
                author: "Jane Austen".to_string(),
                is_public_domain: true,
                owner_id: None,
                chapters: vec![
                    vec!["Elizabeth"; 500].join(" "),
                    vec!["Darcy"; 700].join(" "),
                ],
            })
            .await
            .unwrap();

        let chain = ProviderChain::new(
            vec![summary as Arc<dyn ExtractionProviderPort>],
            vec![characters as Arc<dyn ExtractionProviderPort>],
            ProviderChainConfig::default(),
        );
        let service = Arc::new(ExtractionService::new(
            ExtractionCache::new(db.artifact_store()),
            PositionResolver::new(books),
            Arc::new(chain),
        ));

        Fixture {
            book_id: imported.id,
            summaries: GetSummaryHandler::new(service.clone()),
            characters: GetCharactersHandler::new(service),
            _db: db,
        }
    }

    fn summarizer() -> Arc<FakeExtractionProvider> {
        Arc::new(FakeExtractionProvider::new(
            "anthropic",
            FakeBehavior::Fixed(ArtifactPayload::summary("Elizabeth meets Darcy.")),
        ))
    }

    fn cast() -> Arc<FakeExtractionProvider> {
        Arc::new(FakeExtractionProvider::new(
            "huggingface",
            FakeBehavior::Fixed(ArtifactPayload::characters(vec![CharacterEntry::new(
                "Elizabeth",
                "Character mentioned in the book.",
            )])),
        ))
    }

    #[tokio::test]
    async fn test_summary_is_reused_for_later_positions() {
        let provider = summarizer();
        let f = fixture(provider.clone(), cast()).await;

        let first = f
            .summaries
            .handle(GetSummary {
                book_id: f.book_id,
                position: Position::new(600),
            })
            .await;
        assert_eq!(first.source, ArtifactSource::Extracted);
        assert_eq!(first.position, Position::new(600));
        assert_eq!(first.content, "Elizabeth meets Darcy.");

        // 只使用 [0, 500) 的内容
        let inputs = provider.inputs();
        assert_eq!(inputs.len(), 1);
        assert!(!inputs[0].contains("Darcy"));

        let second = f
            .summaries
            .handle(GetSummary {
                book_id: f.book_id,
                position: Position::new(900),
            })
            .await;
        assert_eq!(second.source, ArtifactSource::Cached);
        assert_eq!(second.id, first.id);
        assert_eq!(second.position, Position::new(600));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cached_artifact_never_served_for_earlier_position() {
        let provider = summarizer();
        let f = fixture(provider.clone(), cast()).await;

        f.summaries
            .handle(GetSummary {
                book_id: f.book_id,
                position: Position::new(1200),
            })
            .await;
        let earlier = f
            .summaries
            .handle(GetSummary {
                book_id: f.book_id,
                position: Position::new(700),
            })
            .await;

        assert_eq!(earlier.source, ArtifactSource::Extracted);
        assert_eq!(earlier.position, Position::new(700));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_position_past_storage_range_reads_whole_book() {
        let provider = summarizer();
        let f = fixture(provider.clone(), cast()).await;

        for far in [u64::MAX, 1 << 63] {
            let response = f
                .summaries
                .handle(GetSummary {
                    book_id: f.book_id,
                    position: Position::new(far),
                })
                .await;
            assert_ne!(
                response.source,
                ArtifactSource::Placeholder(PlaceholderReason::NoContent)
            );
            assert_eq!(response.content, "Elizabeth meets Darcy.");
            assert_eq!(response.position, Position::MAX);
        }

        // 第二次命中缓存
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_characters_before_first_section_end_is_placeholder() {
        let provider = cast();
        let f = fixture(summarizer(), provider.clone()).await;

        let response = f
            .characters
            .handle(GetCharacters {
                book_id: f.book_id,
                position: Position::new(50),
                provider: None,
            })
            .await;

        assert_eq!(
            response.source,
            ArtifactSource::Placeholder(PlaceholderReason::NoContent)
        );
        assert_eq!(response.characters.len(), 1);
        assert_eq!(response.characters[0].name, "Unknown");
        assert_eq!(response.provider, PLACEHOLDER_PROVIDER);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_characters_first_appearance_bounded() {
        let f = fixture(summarizer(), cast()).await;

        let response = f
            .characters
            .handle(GetCharacters {
                book_id: f.book_id,
                position: Position::new(550),
                provider: None,
            })
            .await;

        assert_eq!(response.source, ArtifactSource::Extracted);
        assert_eq!(response.characters[0].first_appearance, Some(Position::new(550)));
    }

    #[tokio::test]
    async fn test_unknown_book_gets_no_content_placeholder() {
        let f = fixture(summarizer(), cast()).await;

        let response = f
            .summaries
            .handle(GetSummary {
                book_id: Uuid::new_v4(),
                position: Position::new(600),
            })
            .await;

        assert_eq!(response.content, NO_CONTENT_SUMMARY);
        assert!(response.id.is_nil());
    }

    #[tokio::test]
    async fn test_exhausted_placeholder_is_not_cached() {
        let failing = Arc::new(FakeExtractionProvider::new(
            "anthropic",
            FakeBehavior::Fail("rate limited".into()),
        ));
        let f = fixture(failing.clone(), cast()).await;

        for _ in 0..2 {
            let response = f
                .summaries
                .handle(GetSummary {
                    book_id: f.book_id,
                    position: Position::new(600),
                })
                .await;
            assert_eq!(response.content, EXHAUSTED_SUMMARY);
            assert_eq!(
                response.source,
                ArtifactSource::Placeholder(PlaceholderReason::Exhausted)
            );
        }

        // 占位内容未写入缓存，第二次请求仍会调用 Provider
        assert_eq!(failing.call_count(), 2);
    }
}
