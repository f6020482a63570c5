//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 书籍聚合管理
//! - Section 实体（带词偏移区间）
//! - 阅读位置与进度计算

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{validate_sections, Book};
pub use entities::Section;
pub use errors::BookError;
pub use value_objects::{BookId, Position, Title};
