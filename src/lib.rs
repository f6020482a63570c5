//! Chapterwise - 按阅读位置提供无剧透的摘要与人物列表
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书籍、Section 与阅读位置
//! - Artifact Context: 摘要 / 人物列表产物与占位内容
//!
//! 应用层 (application/):
//! - Ports: BookRepository, ArtifactStore, ExtractionProvider, PregenerationQueue
//! - Extraction: Position Resolver, Extraction Cache, Provider Chain
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite
//! - Adapters: Hugging Face / Anthropic / OpenAI / 离线 Provider
//! - Memory + Worker: 摘要预生成队列与后台任务

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
