//! Book Queries

use uuid::Uuid;

use crate::domain::book::Position;

/// 获取书籍详情查询
#[derive(Debug, Clone)]
pub struct GetBook {
    pub book_id: Uuid,
}

/// 列出所有书籍查询
#[derive(Debug, Clone)]
pub struct ListBooks;

/// 获取书籍 Section 查询
#[derive(Debug, Clone)]
pub struct GetBookSections {
    pub book_id: Uuid,
    pub start_index: Option<usize>,
    pub limit: Option<usize>,
}

/// 获取阅读进度查询
#[derive(Debug, Clone)]
pub struct GetReadingProgress {
    pub user_id: String,
    pub book_id: Uuid,
}

/// 获取位置摘要查询
#[derive(Debug, Clone)]
pub struct GetSummary {
    pub book_id: Uuid,
    pub position: Position,
}

/// 获取位置人物列表查询
#[derive(Debug, Clone)]
pub struct GetCharacters {
    pub book_id: Uuid,
    pub position: Position,
    /// 优先尝试的 Provider 名称
    pub provider: Option<String>,
}
