//! Book Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookError, BookId, Position, Section, Title};
use crate::domain::sectioner::{section_chapters, SectionConfig};

/// Book 聚合根
///
/// 不变量:
/// - Section 按 index 排序后 index 从 0 连续
/// - 第一个 Section 从位置 0 开始，`end(n) == start(n+1)`
/// - 导入后 Section 不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: Title,
    author: String,
    is_public_domain: bool,
    owner_id: Option<String>,
    sections: Vec<Section>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Book {
    /// 创建空书籍
    pub fn new(title: Title, author: impl Into<String>, is_public_domain: bool) -> Self {
        let now = Utc::now();
        Self {
            id: BookId::new(),
            title,
            author: author.into().trim().to_string(),
            is_public_domain,
            owner_id: None,
            sections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 从章节文本创建书籍并切分 Section
    pub fn from_chapters(
        title: Title,
        author: impl Into<String>,
        is_public_domain: bool,
        chapters: &[String],
        config: &SectionConfig,
    ) -> Result<Self, BookError> {
        let mut book = Self::new(title, author, is_public_domain);

        let sections = section_chapters(chapters, config)
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                Section::new(index, draft.title, draft.content, draft.start, draft.end)
                    .map_err(|e| BookError::InvalidContent(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if sections.is_empty() {
            return Err(BookError::InvalidContent(
                "没有可用的章节内容".to_string(),
            ));
        }

        book.set_sections(sections)?;
        Ok(book)
    }

    /// 设置 Section 并校验连续性
    pub fn set_sections(&mut self, sections: Vec<Section>) -> Result<(), BookError> {
        validate_sections(&sections)?;
        self.sections = sections;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn with_owner(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    // Getters
    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_public_domain(&self) -> bool {
        self.is_public_domain
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 全书总词数（最后一个 Section 的结束位置）
    pub fn total_words(&self) -> Position {
        self.sections
            .last()
            .map(|s| s.end())
            .unwrap_or(Position::ZERO)
    }
}

/// 校验 Section 序列: index 连续、区间首尾相接
pub fn validate_sections(sections: &[Section]) -> Result<(), BookError> {
    let mut expected_start = Position::ZERO;

    for (expected_index, section) in sections.iter().enumerate() {
        if section.index() != expected_index {
            return Err(BookError::SectionOrder {
                expected: expected_index,
                actual: section.index(),
            });
        }
        if section.start() != expected_start {
            return Err(BookError::SectionGap {
                index: section.index(),
                expected: expected_start.value(),
                actual: section.start().value(),
            });
        }
        expected_start = section.end();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(index: usize, start: u64, end: u64) -> Section {
        Section::new(
            index,
            format!("Section {}", index + 1),
            "content".to_string(),
            Position::new(start),
            Position::new(end),
        )
        .unwrap()
    }

    #[test]
    fn test_book_from_chapters() {
        let chapters = vec![
            "It was a bright cold day in April, and the clocks were striking thirteen.".to_string(),
            "Winston Smith, his chin nuzzled into his breast in an effort to escape the vile wind."
                .to_string(),
        ];
        let book = Book::from_chapters(
            Title::new("1984").unwrap(),
            "George Orwell",
            false,
            &chapters,
            &SectionConfig::default(),
        )
        .unwrap();

        assert_eq!(book.sections().len(), 2);
        assert_eq!(book.sections()[1].start(), book.sections()[0].end());
        assert_eq!(book.total_words(), book.sections()[1].end());
    }

    #[test]
    fn test_book_without_content_rejected() {
        let result = Book::from_chapters(
            Title::new("Empty").unwrap(),
            "Nobody",
            true,
            &["tiny".to_string()],
            &SectionConfig::default(),
        );
        assert!(matches!(result, Err(BookError::InvalidContent(_))));
    }

    #[test]
    fn test_validate_sections_detects_gap() {
        let sections = vec![section(0, 0, 500), section(1, 600, 1200)];
        assert!(matches!(
            validate_sections(&sections),
            Err(BookError::SectionGap { index: 1, .. })
        ));
    }

    #[test]
    fn test_validate_sections_detects_order() {
        let sections = vec![section(0, 0, 500), section(2, 500, 1200)];
        assert!(matches!(
            validate_sections(&sections),
            Err(BookError::SectionOrder { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_total_words_empty_book() {
        let book = Book::new(Title::new("Draft").unwrap(), "Anon", true);
        assert_eq!(book.total_words(), Position::ZERO);
    }
}
