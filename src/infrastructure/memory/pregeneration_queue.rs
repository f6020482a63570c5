//! In-Memory Pregeneration Queue

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::application::ports::{PregenerationJob, PregenerationQueuePort, QueueError};

/// 基于 mpsc 通道的预生成队列
pub struct ChannelPregenerationQueue {
    /// 任务队列发送端
    queue_sender: mpsc::Sender<PregenerationJob>,
}

impl ChannelPregenerationQueue {
    pub fn new(queue_sender: mpsc::Sender<PregenerationJob>) -> Self {
        Self { queue_sender }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl PregenerationQueuePort for ChannelPregenerationQueue {
    fn submit(&self, jobs: Vec<PregenerationJob>) -> Result<usize, QueueError> {
        let mut submitted = 0;

        for job in jobs {
            match self.queue_sender.try_send(job) {
                Ok(()) => submitted += 1,
                Err(TrySendError::Full(job)) => {
                    tracing::warn!(book_id = %job.book_id, "Pregeneration queue full");
                    return Err(QueueError::Full);
                }
                Err(TrySendError::Closed(_)) => return Err(QueueError::Closed),
            }
        }

        tracing::debug!(count = submitted, "Pregeneration jobs submitted");
        Ok(submitted)
    }
}
