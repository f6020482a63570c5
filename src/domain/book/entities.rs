//! Book Context - Entities

use serde::{Deserialize, Serialize};

use super::Position;

/// 书籍片段 (Section)
///
/// 不变量:
/// - index 在 Book 内从 0 开始连续
/// - `[start, end)` 为半开区间，`start <= end`
/// - content 不可为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    index: usize,
    title: String,
    content: String,
    start: Position,
    end: Position,
}

impl Section {
    pub fn new(
        index: usize,
        title: String,
        content: String,
        start: Position,
        end: Position,
    ) -> Result<Self, &'static str> {
        if content.trim().is_empty() {
            return Err("片段内容不能为空");
        }
        if start > end {
            return Err("片段起始位置不能大于结束位置");
        }
        Ok(Self {
            index,
            title,
            content,
            start,
            end,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn word_count(&self) -> u64 {
        self.end.value() - self.start.value()
    }

    /// 阅读到 `position` 时该片段是否已完整读完
    pub fn is_read_by(&self, position: Position) -> bool {
        self.end <= position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_rejects_inverted_interval() {
        let result = Section::new(
            0,
            "Section 1".to_string(),
            "text".to_string(),
            Position::new(10),
            Position::new(5),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_is_read_by() {
        let section = Section::new(
            0,
            "Section 1".to_string(),
            "one two three".to_string(),
            Position::new(0),
            Position::new(500),
        )
        .unwrap();

        assert!(!section.is_read_by(Position::new(50)));
        assert!(section.is_read_by(Position::new(500)));
        assert_eq!(section.word_count(), 500);
    }
}
