//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `categories`: 카테고리 CRUD와 카테고리별 스니펫 목록
//! - `snippets`: 스니펫 CRUD
//! - `sessions`: 타이핑 세션 기록/조회, 다음 시작 위치, 통계
//! - `health`: 서버 상태 확인

pub mod categories;
pub mod health;
pub mod sessions;
pub mod snippets;

pub use categories::*;
pub use health::*;
pub use sessions::*;
pub use snippets::*;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SqlitePool`은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// `/api/v1` 아래에 모든 API 라우트를 묶은 라우터를 만듭니다.
///
/// axum 0.8부터 경로 파라미터는 `{id}` 문법을 씁니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        // 카테고리
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).patch(rename_category).delete(delete_category),
        )
        .route("/categories/{id}/snippets", get(list_category_snippets))
        // 스니펫
        .route("/snippets", post(create_snippet))
        .route(
            "/snippets/{id}",
            get(get_snippet).patch(update_snippet).delete(delete_snippet),
        )
        // 타이핑 세션
        .route(
            "/snippets/{id}/sessions",
            get(list_snippet_sessions).post(create_session),
        )
        .route("/snippets/{id}/next-index", get(next_index))
        .route("/snippets/{id}/stats", get(snippet_stats))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/health", get(health_check))
        .with_state(state);

    // 개발 편의를 위해 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let pool = db::connect_in_memory().await.unwrap();
        router(AppState { pool })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_category(app: &Router, name: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "category_name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["category_id"].as_str().unwrap().to_string()
    }

    async fn create_snippet(app: &Router, category_id: &str, name: &str, content: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/snippets",
            Some(json!({
                "category_id": category_id,
                "snippet_name": name,
                "content": content,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["snippet_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn duplicate_category_and_rename_conflict() {
        let app = app().await;
        create_category(&app, "Alpha").await;
        let beta = create_category(&app, "Beta").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "category_name": "Alpha" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/categories/{beta}"),
            Some(json!({ "category_name": "Alpha" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_category_name_reports_field() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "category_name": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["field"], "category_name");
    }

    #[tokio::test]
    async fn snippet_lifecycle() {
        let app = app().await;
        let category = create_category(&app, "Prose").await;
        let long = "a".repeat(2000);
        let id = create_snippet(&app, &category, "Essay", &long).await;

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/snippets/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], long);

        let shorter = "b".repeat(1500);
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/snippets/{id}"),
            Some(json!({ "content": shorter })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], shorter);
        assert_eq!(body["snippet_name"], "Essay");

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/categories/{category}/snippets"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["snippets"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/snippets/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/snippets/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn snippet_in_missing_category_is_rejected() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/snippets",
            Some(json!({
                "category_id": "missing",
                "snippet_name": "Orphan",
                "content": "text",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "category_id");
    }

    #[tokio::test]
    async fn deleting_category_removes_its_snippets() {
        let app = app().await;
        let category = create_category(&app, "Temp").await;
        let id = create_snippet(&app, &category, "One", "hello").await;

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/categories/{category}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/snippets/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/categories/{category}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn session_metrics_and_next_index() {
        let app = app().await;
        let category = create_category(&app, "Drills").await;
        let id = create_snippet(&app, &category, "Five", "abcdefghij").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/snippets/{id}/sessions"),
            Some(json!({
                "snippet_index_start": 0,
                "snippet_index_end": 5,
                "content": "abcde",
                "start_time": "2026-03-01T12:00:00Z",
                "end_time": "2026-03-01T12:01:00Z",
                "actual_chars": 5,
                "errors": 1,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["metrics"]["expected_chars"], 5);
        assert_eq!(body["metrics"]["session_cpm"], 5.0);
        assert_eq!(body["metrics"]["session_wpm"], 1.0);
        assert_eq!(body["metrics"]["ms_per_keystroke"], 12000.0);
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/snippets/{id}/next-index"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next_index"], 5);
        assert_eq!(body["content_length"], 10);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/snippets/{id}/stats"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_count"], 1);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{session_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errors"], 1);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/sessions/{session_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn session_without_content_is_rejected() {
        let app = app().await;
        let category = create_category(&app, "Drills").await;
        let id = create_snippet(&app, &category, "Five", "abcde").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/snippets/{id}/sessions"),
            Some(json!({
                "snippet_index_start": 0,
                "snippet_index_end": 5,
                "content": "",
                "start_time": "2026-03-01T12:00:00Z",
                "end_time": "2026-03-01T12:01:00Z",
                "actual_chars": 5,
                "errors": 0,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "content");
    }

    #[tokio::test]
    async fn sessions_for_unknown_snippet_are_not_found() {
        let app = app().await;
        let (status, _) = send(&app, Method::GET, "/api/v1/snippets/nope/sessions", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::GET, "/api/v1/snippets/nope/next-index", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stored_session_reports_the_same_metrics() {
        let app = app().await;
        let category = create_category(&app, "Timing").await;
        let id = create_snippet(&app, &category, "Five", "abcdefghij").await;

        let (status, posted) = send(
            &app,
            Method::POST,
            &format!("/api/v1/snippets/{id}/sessions"),
            Some(json!({
                "snippet_index_start": 0,
                "snippet_index_end": 5,
                "content": "abcde",
                "start_time": "2026-03-01T12:00:00.0004Z",
                "end_time": "2026-03-01T12:00:01.0009Z",
                "actual_chars": 5,
                "errors": 0,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{posted}");
        assert_eq!(posted["metrics"]["total_time"], 1.0);

        let session_id = posted["session_id"].as_str().unwrap();
        let (status, fetched) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{session_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["metrics"], posted["metrics"]);
        assert_eq!(fetched["start_time"], posted["start_time"]);
    }

    #[tokio::test]
    async fn edit_and_delete_of_unknown_snippet_are_not_found() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/snippets/nope",
            Some(json!({ "content": "fresh text" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");

        let (status, _) = send(&app, Method::DELETE, "/api/v1/snippets/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
