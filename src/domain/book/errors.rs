//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("无效的书名: {0}")]
    InvalidTitle(String),

    #[error("无效的文本内容: {0}")]
    InvalidContent(String),

    #[error("片段区间不连续: index={index}, expected_start={expected}, actual_start={actual}")]
    SectionGap {
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("片段顺序错误: expected_index={expected}, actual_index={actual}")]
    SectionOrder { expected: usize, actual: usize },
}
