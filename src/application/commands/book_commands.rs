//! Book Commands

use uuid::Uuid;

use crate::domain::book::Position;

/// 导入书籍命令（章节纯文本，按顺序）
#[derive(Debug, Clone)]
pub struct ImportBook {
    pub title: String,
    pub author: String,
    pub is_public_domain: bool,
    pub owner_id: Option<String>,
    pub chapters: Vec<String>,
}

/// 更新阅读进度命令
#[derive(Debug, Clone)]
pub struct UpdateReadingProgress {
    pub user_id: String,
    pub book_id: Uuid,
    pub position: Position,
}

/// 预生成摘要命令（全书 10%, 20%, ..., 100% 位置）
#[derive(Debug, Clone)]
pub struct PregenerateSummaries {
    pub book_id: Uuid,
}
