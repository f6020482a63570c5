//! Position Resolver - 计算阅读位置之前可用的书籍内容

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::BookRepositoryPort;
use crate::domain::book::Position;
use crate::domain::PARAGRAPH_SEPARATOR;

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    /// 已读完 Section 的内容，按 index 顺序以段落分隔符拼接
    pub text: String,
    /// 是否存在已读完的 Section
    pub found: bool,
    /// 使用的 Section 数量
    pub section_count: usize,
    /// 使用内容的结束位置（不超过请求位置）
    pub content_end: Position,
}

impl ResolvedContent {
    fn not_found() -> Self {
        Self {
            text: String::new(),
            found: false,
            section_count: 0,
            content_end: Position::ZERO,
        }
    }
}

/// Position Resolver
///
/// 只选择 `end_position <= position` 的 Section，保证产物不会包含位置之后的内容。
/// 无副作用。
pub struct PositionResolver {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl PositionResolver {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    /// 解析 `position` 之前可用的内容
    ///
    /// 书籍不存在时返回 `ApplicationError::NotFound`；
    /// 没有读完的 Section 时返回 `found = false`
    pub async fn resolve(
        &self,
        book_id: Uuid,
        position: Position,
    ) -> Result<ResolvedContent, ApplicationError> {
        if !self.book_repo.exists(book_id).await? {
            return Err(ApplicationError::not_found("Book", book_id));
        }

        let sections = self.book_repo.find_sections_read_by(book_id, position).await?;
        if sections.is_empty() {
            tracing::debug!(book_id = %book_id, position = %position, "No content read yet");
            return Ok(ResolvedContent::not_found());
        }

        let content_end = sections
            .iter()
            .map(|s| s.end_position)
            .max()
            .unwrap_or(Position::ZERO);
        let section_count = sections.len();
        let text = sections
            .into_iter()
            .map(|s| s.content)
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR);

        tracing::debug!(
            book_id = %book_id,
            position = %position,
            section_count,
            content_end = %content_end,
            "Resolved readable content"
        );

        Ok(ResolvedContent {
            text,
            found: true,
            section_count,
            content_end,
        })
    }
}
