//! Book Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::handlers::ReadingProgressResponse;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    BookRecord, BookRepositoryPort, ReadingStateRepositoryPort, SectionRecord,
};
use crate::application::queries::{GetBook, GetBookSections, GetReadingProgress, ListBooks};
use crate::domain::book::Position;

/// Section 分页默认数量
pub const DEFAULT_SECTION_PAGE_SIZE: usize = 100;

// ============================================================================
// Response DTOs
// ============================================================================

/// 书籍详情响应
#[derive(Debug, Clone)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub is_public_domain: bool,
    pub owner_id: Option<String>,
    pub section_count: usize,
    pub total_words: Position,
    pub created_at: String,
}

impl BookResponse {
    fn from_record(record: BookRecord, section_count: usize, total_words: Position) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            is_public_domain: record.is_public_domain,
            owner_id: record.owner_id,
            section_count,
            total_words,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Section 响应
#[derive(Debug, Clone)]
pub struct SectionResponse {
    pub index: usize,
    pub title: String,
    pub content: String,
    pub start_position: Position,
    pub end_position: Position,
}

impl From<SectionRecord> for SectionResponse {
    fn from(record: SectionRecord) -> Self {
        Self {
            index: record.index,
            title: record.title,
            content: record.content,
            start_position: record.start_position,
            end_position: record.end_position,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn describe(
    repo: &dyn BookRepositoryPort,
    record: BookRecord,
) -> Result<BookResponse, ApplicationError> {
    let section_count = repo.count_sections(record.id).await?;
    let total_words = repo.total_words(record.id).await?;
    Ok(BookResponse::from_record(record, section_count, total_words))
}

/// GetBook Handler
pub struct GetBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetBook) -> Result<BookResponse, ApplicationError> {
        let book = self
            .book_repo
            .find_by_id(query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.book_id))?;

        describe(self.book_repo.as_ref(), book).await
    }
}

/// ListBooks Handler
pub struct ListBooksHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl ListBooksHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, _query: ListBooks) -> Result<Vec<BookResponse>, ApplicationError> {
        let books = self.book_repo.find_all().await?;

        let mut responses = Vec::with_capacity(books.len());
        for book in books {
            responses.push(describe(self.book_repo.as_ref(), book).await?);
        }
        Ok(responses)
    }
}

/// GetBookSections Handler
pub struct GetBookSectionsHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetBookSectionsHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(
        &self,
        query: GetBookSections,
    ) -> Result<Vec<SectionResponse>, ApplicationError> {
        // 验证书籍存在
        if !self.book_repo.exists(query.book_id).await? {
            return Err(ApplicationError::not_found("Book", query.book_id));
        }

        let offset = query.start_index.unwrap_or(0);
        let limit = query.limit.unwrap_or(DEFAULT_SECTION_PAGE_SIZE);

        let sections = self
            .book_repo
            .find_sections_paginated(query.book_id, offset, limit)
            .await?;

        Ok(sections.into_iter().map(SectionResponse::from).collect())
    }
}

/// GetReadingProgress Handler
pub struct GetReadingProgressHandler {
    reading_repo: Arc<dyn ReadingStateRepositoryPort>,
}

impl GetReadingProgressHandler {
    pub fn new(reading_repo: Arc<dyn ReadingStateRepositoryPort>) -> Self {
        Self { reading_repo }
    }

    pub async fn handle(
        &self,
        query: GetReadingProgress,
    ) -> Result<ReadingProgressResponse, ApplicationError> {
        let state = self
            .reading_repo
            .find(&query.user_id, query.book_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("ReadingState", query.book_id))?;

        Ok(ReadingProgressResponse::from(state))
    }
}
