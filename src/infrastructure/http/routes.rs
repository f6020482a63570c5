//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                                   GET   健康检查
//! - /api/books                                  POST  导入书籍
//! - /api/books                                  GET   列出所有书籍
//! - /api/books/:book_id                         GET   获取书籍详情
//! - /api/books/:book_id/sections                GET   分页获取 Section
//! - /api/books/:book_id/summary                 GET   获取位置之前的摘要
//! - /api/books/:book_id/characters              GET   获取位置之前的人物
//! - /api/books/:book_id/summaries/pregenerate   POST  提交摘要预生成
//! - /api/books/:book_id/progress                GET   获取阅读进度
//! - /api/books/:book_id/progress                PUT   更新阅读进度

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/books", book_routes())
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::import_book).get(handlers::list_books))
        .route("/:book_id", get(handlers::get_book))
        .route("/:book_id/sections", get(handlers::get_book_sections))
        .route("/:book_id/summary", get(handlers::get_summary))
        .route("/:book_id/characters", get(handlers::get_characters))
        .route(
            "/:book_id/summaries/pregenerate",
            post(handlers::pregenerate_summaries),
        )
        .route(
            "/:book_id/progress",
            get(handlers::get_progress).put(handlers::update_progress),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    use crate::application::{
        ExtractionCache, ExtractionService, ExtractionProviderPort, PositionResolver,
        PregenerationJob, ProviderChain, ProviderChainConfig,
    };
    use crate::domain::SectionConfig;
    use crate::infrastructure::adapters::extraction::FakeExtractionProvider;
    use crate::infrastructure::memory::ChannelPregenerationQueue;
    use crate::infrastructure::persistence::sqlite::Database;

    struct TestApp {
        router: Router,
        jobs: mpsc::Receiver<PregenerationJob>,
        provider: Arc<FakeExtractionProvider>,
    }

    async fn test_app() -> TestApp {
        let db = Database::in_memory().await.unwrap();
        let books = db.book_repository();

        let provider = Arc::new(FakeExtractionProvider::offline());
        let shared = provider.clone() as Arc<dyn ExtractionProviderPort>;
        let chain = ProviderChain::new(
            vec![shared.clone()],
            vec![shared],
            ProviderChainConfig::default(),
        );
        let service = Arc::new(ExtractionService::new(
            ExtractionCache::new(db.artifact_store()),
            PositionResolver::new(books.clone()),
            Arc::new(chain),
        ));

        let (tx, jobs) = mpsc::channel(4);
        let state = AppState::new(
            books,
            db.reading_state_repository(),
            service,
            ChannelPregenerationQueue::new(tx).arc(),
            SectionConfig::default(),
        );

        TestApp {
            router: create_routes().with_state(Arc::new(state)),
            jobs,
            provider,
        }
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Value {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn import(router: &Router) -> String {
        let body = json!({
            "title": "Pride and Prejudice",
            "author": "Jane Austen",
            "isPublicDomain": true,
            "chapters": [
                "Elizabeth Bennet walked to Netherfield. Elizabeth was tired but Jane was glad to see her.",
                "Darcy arrived at the ball. Darcy refused to dance and Elizabeth overheard every word."
            ]
        });
        let resp = send(router, Method::POST, "/api/books", Some(body)).await;
        assert_eq!(resp["errno"], 0);
        resp["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_ping() {
        let app = test_app().await;
        let resp = app
            .router
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_import_then_get_and_list() {
        let app = test_app().await;
        let id = import(&app.router).await;

        let book = send(&app.router, Method::GET, &format!("/api/books/{}", id), None).await;
        assert_eq!(book["errno"], 0);
        assert_eq!(book["data"]["title"], "Pride and Prejudice");
        assert_eq!(book["data"]["sectionCount"], 2);

        let list = send(&app.router, Method::GET, "/api/books", None).await;
        assert_eq!(list["data"].as_array().unwrap().len(), 1);

        let sections = send(
            &app.router,
            Method::GET,
            &format!("/api/books/{}/sections?start=1&limit=5", id),
            None,
        )
        .await;
        let sections = sections["data"]["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0]["index"], 1);
    }

    #[tokio::test]
    async fn test_import_rejects_blank_title() {
        let app = test_app().await;
        let body = json!({"title": "  ", "chapters": ["x".repeat(80)]});
        let resp = send(&app.router, Method::POST, "/api/books", Some(body)).await;
        assert_eq!(resp["errno"], 400);
        assert!(resp["data"].is_null());
    }

    #[tokio::test]
    async fn test_summary_is_cached_between_requests() {
        let app = test_app().await;
        let id = import(&app.router).await;
        let uri = format!("/api/books/{}/summary?position=20", id);

        let first = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(first["errno"], 0);
        let first_id = first["data"]["id"].as_str().unwrap().to_string();
        assert_ne!(first_id, "placeholder");
        assert_eq!(first["data"]["bookId"], id.as_str());

        let second = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(second["data"]["id"], first_id.as_str());
        assert_eq!(app.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_summary_for_unknown_book_is_placeholder() {
        let app = test_app().await;
        let uri = format!("/api/books/{}/summary?position=10", uuid::Uuid::new_v4());

        let resp = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(resp["errno"], 0);
        assert_eq!(resp["data"]["id"], "placeholder");
        assert_eq!(
            resp["data"]["content"],
            "No summary available for this position yet."
        );
    }

    #[tokio::test]
    async fn test_characters_returns_bare_list() {
        let app = test_app().await;
        let id = import(&app.router).await;
        let uri = format!("/api/books/{}/characters?position=100&provider=fake", id);

        let resp = send(&app.router, Method::GET, &uri, None).await;
        assert_eq!(resp["errno"], 0);
        let names: Vec<&str> = resp["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"Elizabeth"));
        assert!(names.contains(&"Darcy"));
    }

    #[tokio::test]
    async fn test_invalid_requests_use_error_envelope() {
        let app = test_app().await;

        let bad_id = send(&app.router, Method::GET, "/api/books/not-a-uuid/summary?position=1", None).await;
        assert_eq!(bad_id["errno"], 400);

        let id = import(&app.router).await;
        let no_position = send(&app.router, Method::GET, &format!("/api/books/{}/summary", id), None).await;
        assert_eq!(no_position["errno"], 400);

        let missing = send(
            &app.router,
            Method::GET,
            &format!("/api/books/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(missing["errno"], 404);
    }

    #[tokio::test]
    async fn test_pregenerate_enqueues_job() {
        let mut app = test_app().await;
        let id = import(&app.router).await;

        let resp = send(
            &app.router,
            Method::POST,
            &format!("/api/books/{}/summaries/pregenerate", id),
            None,
        )
        .await;
        assert_eq!(resp["errno"], 0);
        assert_eq!(resp["data"]["queued"], true);

        let job = app.jobs.try_recv().unwrap();
        assert_eq!(job.book_id.as_uuid().to_string(), id);
    }

    #[tokio::test]
    async fn test_progress_roundtrip() {
        let app = test_app().await;
        let id = import(&app.router).await;
        let uri = format!("/api/books/{}/progress", id);

        let missing = send(&app.router, Method::GET, &format!("{}?user_id=reader-1", uri), None).await;
        assert_eq!(missing["errno"], 404);

        let updated = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(json!({"userId": "reader-1", "position": 15})),
        )
        .await;
        assert_eq!(updated["errno"], 0);
        assert_eq!(updated["data"]["position"], 15);

        let fetched = send(&app.router, Method::GET, &format!("{}?user_id=reader-1", uri), None).await;
        assert_eq!(fetched["data"]["position"], 15);
        assert_eq!(fetched["data"]["userId"], "reader-1");
    }
}
