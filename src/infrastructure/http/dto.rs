//! Data Transfer Objects
//!
//! 对外 JSON 字段统一使用 camelCase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    BookResponse, CharactersResponse, ImportBookResponse, PregenerateSummariesResponse,
    ReadingProgressResponse, SectionResponse, SummaryResponse,
};
use crate::domain::artifact::CharacterEntry;

/// 占位产物在接口中的 id
pub const PLACEHOLDER_ID: &str = "placeholder";

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Book DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBookRequest {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub is_public_domain: bool,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub chapters: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub section_count: usize,
    pub total_words: u64,
}

impl From<ImportBookResponse> for ImportBookDto {
    fn from(r: ImportBookResponse) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author: r.author,
            section_count: r.section_count,
            total_words: r.total_words.value(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub is_public_domain: bool,
    pub owner_id: Option<String>,
    pub section_count: usize,
    pub total_words: u64,
    pub created_at: String,
}

impl From<BookResponse> for BookDto {
    fn from(r: BookResponse) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author: r.author,
            is_public_domain: r.is_public_domain,
            owner_id: r.owner_id,
            section_count: r.section_count,
            total_words: r.total_words.value(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SectionsQuery {
    pub start: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDto {
    pub index: usize,
    pub title: String,
    pub content: String,
    pub start_position: u64,
    pub end_position: u64,
}

impl From<SectionResponse> for SectionDto {
    fn from(r: SectionResponse) -> Self {
        Self {
            index: r.index,
            title: r.title,
            content: r.content,
            start_position: r.start_position.value(),
            end_position: r.end_position.value(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionsDto {
    pub book_id: Uuid,
    pub sections: Vec<SectionDto>,
}

// ============================================================================
// Artifact DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub position: u64,
}

#[derive(Debug, Deserialize)]
pub struct CharactersQuery {
    pub position: u64,
    pub provider: Option<String>,
}

fn wire_id(id: Uuid) -> String {
    if id.is_nil() {
        PLACEHOLDER_ID.to_string()
    } else {
        id.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub id: String,
    pub book_id: Uuid,
    pub position: u64,
    pub content: String,
    pub created_at: String,
}

impl From<SummaryResponse> for SummaryDto {
    fn from(r: SummaryResponse) -> Self {
        Self {
            id: wire_id(r.id),
            book_id: r.book_id,
            position: r.position.value(),
            content: r.content,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDto {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_appearance: Option<u64>,
}

impl From<CharacterEntry> for CharacterDto {
    fn from(entry: CharacterEntry) -> Self {
        Self {
            name: entry.name,
            description: entry.description,
            first_appearance: entry.first_appearance.map(|p| p.value()),
        }
    }
}

pub fn characters_dto(r: CharactersResponse) -> Vec<CharacterDto> {
    r.characters.into_iter().map(CharacterDto::from).collect()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PregenerateDto {
    pub book_id: Uuid,
    pub queued: bool,
}

impl From<PregenerateSummariesResponse> for PregenerateDto {
    fn from(r: PregenerateSummariesResponse) -> Self {
        Self {
            book_id: r.book_id,
            queued: r.queued,
        }
    }
}

// ============================================================================
// Progress DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[serde(alias = "user_id")]
    pub user_id: String,
    pub position: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    pub user_id: String,
    pub book_id: Uuid,
    pub position: u64,
    pub progress: u8,
    pub last_read_at: String,
}

impl From<ReadingProgressResponse> for ProgressDto {
    fn from(r: ReadingProgressResponse) -> Self {
        Self {
            user_id: r.user_id,
            book_id: r.book_id,
            position: r.position.value(),
            progress: r.progress,
            last_read_at: r.last_read_at,
        }
    }
}
