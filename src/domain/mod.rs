//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Book Context: 书籍与 Section 管理
//! - Artifact Context: 按位置缓存的摘要与人物列表

pub mod artifact;
pub mod book;

// 共享的章节切分器与输入截断
mod sectioner;
mod truncation;

pub use sectioner::{
    count_words, section_chapters, SectionConfig, SectionDraft, DEFAULT_MAX_WORDS_PER_SECTION,
    DEFAULT_MIN_CHAPTER_CHARS, PARAGRAPH_SEPARATOR,
};
pub use truncation::{input_fingerprint, truncate_chars};
