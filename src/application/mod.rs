//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、ArtifactStore、ExtractionProvider、队列）
//! - extraction: 按位置的缓存 / 解析 / Provider 链
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod extraction;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Book commands
    ImportBook,
    PregenerateSummaries,
    UpdateReadingProgress,
    // Handlers
    handlers::{
        ImportBookHandler, ImportBookResponse, PregenerateSummariesHandler,
        PregenerateSummariesResponse, ReadingProgressResponse, UpdateReadingProgressHandler,
    },
};

pub use error::ApplicationError;

pub use extraction::{
    ArtifactSource, ArtifactView, Extraction, ExtractionCache, ExtractionService,
    PositionResolver, PregenerateReport, ProviderChain, ProviderChainConfig, SummaryPregenerator,
};

pub use ports::{
    // Artifact store
    ArtifactStorePort,
    // Extraction providers
    ExtractionProviderPort,
    ProviderError,
    // Pregeneration queue
    PregenerationJob,
    PregenerationQueuePort,
    QueueError,
    // Repositories
    BookRecord,
    BookRepositoryPort,
    ReadingStateRecord,
    ReadingStateRepositoryPort,
    RepositoryError,
    SectionRecord,
};

pub use queries::{
    // Book queries
    GetBook,
    GetBookSections,
    GetCharacters,
    GetReadingProgress,
    GetSummary,
    ListBooks,
    // Handlers
    handlers::{
        BookResponse, CharactersResponse, GetBookHandler, GetBookSectionsHandler,
        GetCharactersHandler, GetReadingProgressHandler, GetSummaryHandler, ListBooksHandler,
        SectionResponse, SummaryResponse,
    },
};
