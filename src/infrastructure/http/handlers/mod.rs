//! HTTP Handlers

mod artifact;
mod book;
mod ping;
mod progress;

pub use artifact::*;
pub use book::*;
pub use ping::*;
pub use progress::*;

use uuid::Uuid;

use super::error::ApiError;

/// 解析路径中的书籍 ID
pub(crate) fn parse_book_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid book id: {}", raw)))
}
