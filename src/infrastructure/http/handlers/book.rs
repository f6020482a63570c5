//! Book HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::parse_book_id;
use crate::application::{GetBook, GetBookSections, ImportBook, ListBooks, PregenerateSummaries};
use crate::infrastructure::http::dto::{
    ApiResponse, BookDto, ImportBookDto, ImportBookRequest, PregenerateDto, SectionDto,
    SectionsDto, SectionsQuery,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 导入书籍（按章节文本）
pub async fn import_book(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ImportBookRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ImportBookDto>>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result = state
        .import_book_handler
        .handle(ImportBook {
            title: req.title,
            author: req.author,
            is_public_domain: req.is_public_domain,
            owner_id: req.owner_id,
            chapters: req.chapters,
        })
        .await?;

    Ok(Json(ApiResponse::success(result.into())))
}

/// 列出所有书籍
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BookDto>>>, ApiError> {
    let books = state.list_books_handler.handle(ListBooks).await?;
    Ok(Json(ApiResponse::success(
        books.into_iter().map(BookDto::from).collect(),
    )))
}

/// 获取书籍详情
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<ApiResponse<BookDto>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let book = state.get_book_handler.handle(GetBook { book_id }).await?;
    Ok(Json(ApiResponse::success(book.into())))
}

/// 分页获取书籍 Section
pub async fn get_book_sections(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    Query(query): Query<SectionsQuery>,
) -> Result<Json<ApiResponse<SectionsDto>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let sections = state
        .get_sections_handler
        .handle(GetBookSections {
            book_id,
            start_index: query.start,
            limit: query.limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(SectionsDto {
        book_id,
        sections: sections.into_iter().map(SectionDto::from).collect(),
    })))
}

/// 提交摘要预生成任务
pub async fn pregenerate_summaries(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<ApiResponse<PregenerateDto>>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let result = state
        .pregenerate_handler
        .handle(PregenerateSummaries { book_id })
        .await?;
    Ok(Json(ApiResponse::success(result.into())))
}
