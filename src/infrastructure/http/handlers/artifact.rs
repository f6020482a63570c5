//! Artifact HTTP Handlers - 按阅读位置获取摘要与人物列表
//!
//! 内容缺失或 Provider 全部失败时返回占位内容，errno 仍为 0

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::parse_book_id;
use crate::application::{GetCharacters, GetSummary};
use crate::domain::book::Position;
use crate::infrastructure::http::dto::{
    characters_dto, ApiResponse, CharacterDto, CharactersQuery, SummaryDto, SummaryQuery,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取阅读位置之前的摘要
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SummaryDto>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let summary = state
        .get_summary_handler
        .handle(GetSummary {
            book_id,
            position: Position::new(query.position),
        })
        .await;

    tracing::debug!(
        book_id = %book_id,
        position = query.position,
        source = summary.source.as_str(),
        provider = %summary.provider,
        "Summary served"
    );

    Ok(Json(ApiResponse::success(summary.into())))
}

/// 获取阅读位置之前出场的人物
pub async fn get_characters(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    query: Result<Query<CharactersQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CharacterDto>>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let characters = state
        .get_characters_handler
        .handle(GetCharacters {
            book_id,
            position: Position::new(query.position),
            provider: query.provider.filter(|p| !p.trim().is_empty()),
        })
        .await;

    tracing::debug!(
        book_id = %book_id,
        position = query.position,
        source = characters.source.as_str(),
        provider = %characters.provider,
        count = characters.characters.len(),
        "Characters served"
    );

    Ok(Json(ApiResponse::success(characters_dto(characters))))
}
