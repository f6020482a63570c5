//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod extraction_provider;
mod pregeneration_queue;
mod repositories;

pub use artifact_store::ArtifactStorePort;
pub use extraction_provider::{
    ExtractionProviderPort, ProviderError, DEFAULT_PROVIDER_TIMEOUT_SECS, LLM_INPUT_CHARS,
    NER_INPUT_CHARS,
};
pub use pregeneration_queue::{PregenerationJob, PregenerationQueuePort, QueueError};
pub use repositories::{
    BookRecord, BookRepositoryPort, ReadingStateRecord, ReadingStateRepositoryPort,
    RepositoryError, SectionRecord,
};
