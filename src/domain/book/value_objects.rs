//! Book Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 书籍唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 阅读位置
///
/// 单位: 书内的词偏移量（按空白切分计数），与 Section 边界使用同一单位。
/// 位置同时是防剧透边界：位置 P 的产物只能使用 `end <= P` 的 Section。
///
/// 取值上限为 `Position::MAX`（SQLite INTEGER 的最大值），更大的偏移量按上限处理。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "u64")]
pub struct Position(u64);

impl Position {
    pub const ZERO: Position = Position(0);
    pub const MAX: Position = Position(i64::MAX as u64);

    pub fn new(offset: u64) -> Self {
        Self(offset.min(Self::MAX.0))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 向后推进若干词
    pub fn advance(self, words: u64) -> Self {
        Self::new(self.0.saturating_add(words))
    }

    /// 阅读进度百分比 (0-100)
    ///
    /// `total_words` 为 0 时返回 0
    pub fn progress_percent(&self, total_words: Position) -> u8 {
        if total_words.0 == 0 {
            return 0;
        }
        let percent = (self.0 as f64 / total_words.0 as f64 * 100.0).round();
        percent.min(100.0) as u8
    }

    /// 按百分比计算书内位置（向下取整）
    pub fn at_percent(total_words: Position, percent: u8) -> Self {
        let offset = u128::from(total_words.0) * u128::from(percent.min(100)) / 100;
        Self::new(u64::try_from(offset).unwrap_or(u64::MAX))
    }
}

impl From<u64> for Position {
    fn from(offset: u64) -> Self {
        Self::new(offset)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 书名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err("书名不能为空");
        }
        if title.chars().count() > 200 {
            return Err("书名长度不能超过200字符");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
