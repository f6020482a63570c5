//! Pregeneration Queue Port - 后台预生成任务队列

use thiserror::Error;

use crate::domain::book::BookId;

/// 预生成任务（整本书）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PregenerationJob {
    pub book_id: BookId,
}

/// 队列错误
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Pregeneration queue is closed")]
    Closed,

    #[error("Pregeneration queue is full")]
    Full,
}

/// Pregeneration Queue Port
pub trait PregenerationQueuePort: Send + Sync {
    /// 提交任务，返回成功入队的数量
    fn submit(&self, jobs: Vec<PregenerationJob>) -> Result<usize, QueueError>;
}
