//! Reading Progress HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::parse_book_id;
use crate::application::{GetReadingProgress, UpdateReadingProgress};
use crate::domain::book::Position;
use crate::infrastructure::http::dto::{
    ApiResponse, ProgressDto, ProgressQuery, UpdateProgressRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取阅读进度
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    query: Result<Query<ProgressQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ProgressDto>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let progress = state
        .get_progress_handler
        .handle(GetReadingProgress {
            user_id: query.user_id,
            book_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(progress.into())))
}

/// 更新阅读进度
pub async fn update_progress(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    body: Result<Json<UpdateProgressRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ProgressDto>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let progress = state
        .update_progress_handler
        .handle(UpdateReadingProgress {
            user_id: req.user_id,
            book_id,
            position: Position::new(req.position),
        })
        .await?;

    Ok(Json(ApiResponse::success(progress.into())))
}
