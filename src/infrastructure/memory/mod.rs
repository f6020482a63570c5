//! Memory Layer - In-Memory State Management
//!
//! 实现预生成任务队列

mod pregeneration_queue;

pub use pregeneration_queue::ChannelPregenerationQueue;
