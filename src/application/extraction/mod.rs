//! 按位置的内容提取
//!
//! - resolver: 计算阅读位置之前可用的内容
//! - cache: 最佳前序覆盖的产物缓存
//! - chain: 有序 Provider 链
//! - service: 串联以上三者
//! - pregenerate: 按百分比位置预生成摘要

mod cache;
mod chain;
mod pregenerate;
mod resolver;
mod service;

pub use cache::ExtractionCache;
pub use chain::{Extraction, ProviderChain, ProviderChainConfig};
pub use pregenerate::{
    pregenerate_targets, PregenerateReport, SummaryPregenerator,
    DEFAULT_PREGENERATE_INTERVAL_PERCENT,
};
pub use resolver::{PositionResolver, ResolvedContent};
pub use service::{ArtifactSource, ArtifactView, ExtractionService, PregenerateOutcome};
