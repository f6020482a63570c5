//! Book Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{ImportBook, PregenerateSummaries, UpdateReadingProgress};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookRecord, BookRepositoryPort, PregenerationJob, PregenerationQueuePort, QueueError,
    ReadingStateRecord, ReadingStateRepositoryPort, SectionRecord,
};
use crate::domain::book::{Book, BookId, Position, Title};
use crate::domain::SectionConfig;

// ============================================================================
// ImportBook
// ============================================================================

/// 导入书籍响应
#[derive(Debug, Clone)]
pub struct ImportBookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub section_count: usize,
    pub total_words: Position,
}

/// ImportBook Handler - 切分章节并持久化书籍与 Section
pub struct ImportBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    section_config: SectionConfig,
}

impl ImportBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>, section_config: SectionConfig) -> Self {
        Self {
            book_repo,
            section_config,
        }
    }

    pub async fn handle(&self, command: ImportBook) -> Result<ImportBookResponse, ApplicationError> {
        let title = Title::new(command.title).map_err(ApplicationError::validation)?;

        let book = Book::from_chapters(
            title,
            command.author,
            command.is_public_domain,
            &command.chapters,
            &self.section_config,
        )?
        .with_owner(command.owner_id);

        let book_id = *book.id().as_uuid();
        let record = BookRecord {
            id: book_id,
            title: book.title().to_string(),
            author: book.author().to_string(),
            is_public_domain: book.is_public_domain(),
            owner_id: book.owner_id().map(str::to_string),
            created_at: book.created_at(),
            updated_at: book.updated_at(),
        };

        let sections: Vec<SectionRecord> = book
            .sections()
            .iter()
            .map(|s| SectionRecord {
                id: Uuid::new_v4(),
                book_id,
                index: s.index(),
                title: s.title().to_string(),
                content: s.content().to_string(),
                start_position: s.start(),
                end_position: s.end(),
            })
            .collect();

        self.book_repo.save(&record).await?;
        self.book_repo.save_sections(&sections).await?;

        tracing::info!(
            book_id = %book_id,
            title = %record.title,
            sections = sections.len(),
            total_words = %book.total_words(),
            "Book imported"
        );

        Ok(ImportBookResponse {
            id: book_id,
            title: record.title,
            author: record.author,
            section_count: sections.len(),
            total_words: book.total_words(),
        })
    }
}

// ============================================================================
// UpdateReadingProgress
// ============================================================================

/// 阅读进度响应
#[derive(Debug, Clone)]
pub struct ReadingProgressResponse {
    pub user_id: String,
    pub book_id: Uuid,
    pub position: Position,
    pub progress: u8,
    pub last_read_at: String,
}

impl From<ReadingStateRecord> for ReadingProgressResponse {
    fn from(record: ReadingStateRecord) -> Self {
        Self {
            user_id: record.user_id,
            book_id: record.book_id,
            position: record.position,
            progress: record.progress,
            last_read_at: record.last_read_at.to_rfc3339(),
        }
    }
}

/// UpdateReadingProgress Handler
pub struct UpdateReadingProgressHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    reading_repo: Arc<dyn ReadingStateRepositoryPort>,
}

impl UpdateReadingProgressHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        reading_repo: Arc<dyn ReadingStateRepositoryPort>,
    ) -> Self {
        Self {
            book_repo,
            reading_repo,
        }
    }

    pub async fn handle(
        &self,
        command: UpdateReadingProgress,
    ) -> Result<ReadingProgressResponse, ApplicationError> {
        let user_id = command.user_id.trim();
        if user_id.is_empty() {
            return Err(ApplicationError::validation("user_id 不能为空"));
        }

        if !self.book_repo.exists(command.book_id).await? {
            return Err(ApplicationError::not_found("Book", command.book_id));
        }

        let total_words = self.book_repo.total_words(command.book_id).await?;
        let now = Utc::now();
        let state = ReadingStateRecord {
            user_id: user_id.to_string(),
            book_id: command.book_id,
            position: command.position,
            progress: command.position.progress_percent(total_words),
            last_read_at: now,
            created_at: now,
            updated_at: now,
        };

        let saved = self.reading_repo.upsert(&state).await?;

        tracing::debug!(
            user_id = %saved.user_id,
            book_id = %saved.book_id,
            position = %saved.position,
            progress = saved.progress,
            "Reading progress updated"
        );

        Ok(ReadingProgressResponse::from(saved))
    }
}

// ============================================================================
// PregenerateSummaries
// ============================================================================

/// 预生成响应
#[derive(Debug, Clone)]
pub struct PregenerateSummariesResponse {
    pub book_id: Uuid,
    pub queued: bool,
}

/// PregenerateSummaries Handler - 校验书籍并提交后台任务
pub struct PregenerateSummariesHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    queue: Arc<dyn PregenerationQueuePort>,
}

impl PregenerateSummariesHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        queue: Arc<dyn PregenerationQueuePort>,
    ) -> Self {
        Self { book_repo, queue }
    }

    pub async fn handle(
        &self,
        command: PregenerateSummaries,
    ) -> Result<PregenerateSummariesResponse, ApplicationError> {
        if !self.book_repo.exists(command.book_id).await? {
            return Err(ApplicationError::not_found("Book", command.book_id));
        }

        let job = PregenerationJob {
            book_id: BookId::from_uuid(command.book_id),
        };
        self.queue.submit(vec![job]).map_err(|e| match e {
            QueueError::Closed | QueueError::Full => ApplicationError::Unavailable(e.to_string()),
        })?;

        tracing::info!(book_id = %command.book_id, "Summary pregeneration queued");

        Ok(PregenerateSummariesResponse {
            book_id: command.book_id,
            queued: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::Database;

    fn chapters() -> Vec<String> {
        vec![
            format!("Chapter 1\n\n{}", "word ".repeat(500)),
            "Contents".to_string(),
            format!("Chapter 2\n\n{}", "word ".repeat(700)),
        ]
    }

    fn import(title: &str) -> ImportBook {
        ImportBook {
            title: title.to_string(),
            author: "Jane Austen".to_string(),
            is_public_domain: true,
            owner_id: None,
            chapters: chapters(),
        }
    }

    #[tokio::test]
    async fn test_import_book_persists_sections() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.book_repository();
        let handler = ImportBookHandler::new(repo.clone(), SectionConfig::default());

        let response = handler.handle(import("Pride and Prejudice")).await.unwrap();

        assert_eq!(response.section_count, 2);
        assert_eq!(response.total_words, Position::new(1204));
        assert_eq!(repo.count_sections(response.id).await.unwrap(), 2);
        assert_eq!(repo.total_words(response.id).await.unwrap(), Position::new(1204));
    }

    #[tokio::test]
    async fn test_import_book_rejects_blank_title() {
        let db = Database::in_memory().await.unwrap();
        let handler = ImportBookHandler::new(db.book_repository(), SectionConfig::default());

        let err = handler.handle(import("   ")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_import_book_rejects_empty_chapters() {
        let db = Database::in_memory().await.unwrap();
        let handler = ImportBookHandler::new(db.book_repository(), SectionConfig::default());

        let mut command = import("Empty");
        command.chapters = vec!["Preface".to_string()];
        let err = handler.handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_reading_progress_upserts() {
        let db = Database::in_memory().await.unwrap();
        let books = db.book_repository();
        let imported = ImportBookHandler::new(books.clone(), SectionConfig::default())
            .handle(import("Emma"))
            .await
            .unwrap();
        let handler = UpdateReadingProgressHandler::new(books, db.reading_state_repository());

        let first = handler
            .handle(UpdateReadingProgress {
                user_id: "reader-1".to_string(),
                book_id: imported.id,
                position: Position::new(602),
            })
            .await
            .unwrap();
        assert_eq!(first.progress, 50);

        let second = handler
            .handle(UpdateReadingProgress {
                user_id: "reader-1".to_string(),
                book_id: imported.id,
                position: Position::new(5000),
            })
            .await
            .unwrap();
        assert_eq!(second.position, Position::new(5000));
        assert_eq!(second.progress, 100);
    }

    #[tokio::test]
    async fn test_update_reading_progress_unknown_book() {
        let db = Database::in_memory().await.unwrap();
        let handler =
            UpdateReadingProgressHandler::new(db.book_repository(), db.reading_state_repository());

        let err = handler
            .handle(UpdateReadingProgress {
                user_id: "reader-1".to_string(),
                book_id: Uuid::new_v4(),
                position: Position::new(10),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
