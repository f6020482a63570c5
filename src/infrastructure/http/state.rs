//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ImportBookHandler, PregenerateSummariesHandler, UpdateReadingProgressHandler,
    // Query handlers
    GetBookHandler, GetBookSectionsHandler, GetCharactersHandler, GetReadingProgressHandler,
    GetSummaryHandler, ListBooksHandler,
    // Ports
    BookRepositoryPort, ExtractionService, PregenerationQueuePort, ReadingStateRepositoryPort,
};
use crate::domain::SectionConfig;

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub import_book_handler: ImportBookHandler,
    pub update_progress_handler: UpdateReadingProgressHandler,
    pub pregenerate_handler: PregenerateSummariesHandler,

    // ========== Query Handlers ==========
    pub get_book_handler: GetBookHandler,
    pub list_books_handler: ListBooksHandler,
    pub get_sections_handler: GetBookSectionsHandler,
    pub get_progress_handler: GetReadingProgressHandler,
    pub get_summary_handler: GetSummaryHandler,
    pub get_characters_handler: GetCharactersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        reading_repo: Arc<dyn ReadingStateRepositoryPort>,
        extraction: Arc<ExtractionService>,
        pregeneration_queue: Arc<dyn PregenerationQueuePort>,
        section_config: SectionConfig,
    ) -> Self {
        Self {
            // Command handlers
            import_book_handler: ImportBookHandler::new(book_repo.clone(), section_config),
            update_progress_handler: UpdateReadingProgressHandler::new(
                book_repo.clone(),
                reading_repo.clone(),
            ),
            pregenerate_handler: PregenerateSummariesHandler::new(
                book_repo.clone(),
                pregeneration_queue,
            ),

            // Query handlers
            get_book_handler: GetBookHandler::new(book_repo.clone()),
            list_books_handler: ListBooksHandler::new(book_repo.clone()),
            get_sections_handler: GetBookSectionsHandler::new(book_repo),
            get_progress_handler: GetReadingProgressHandler::new(reading_repo),
            get_summary_handler: GetSummaryHandler::new(extraction.clone()),
            get_characters_handler: GetCharactersHandler::new(extraction),
        }
    }
}
