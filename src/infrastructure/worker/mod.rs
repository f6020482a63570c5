//! Worker Layer - Background Task Processing
//!
//! 实现 PregenerateWorker，处理摘要预生成任务

mod pregenerate_worker;

pub use pregenerate_worker::{PregenerateWorker, PregenerateWorkerConfig};
