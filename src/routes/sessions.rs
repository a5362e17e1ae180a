//! # 타이핑 세션 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/snippets/{id}/sessions | `list_snippet_sessions` | 스니펫의 세션 목록 (지표 포함) |
//! | POST | /api/v1/snippets/{id}/sessions | `create_session` | 연습 결과 기록 |
//! | GET | /api/v1/snippets/{id}/next-index | `next_index` | 이어서 칠 시작 위치 |
//! | GET | /api/v1/snippets/{id}/stats | `snippet_stats` | 세션 평균 지표 |
//! | GET | /api/v1/sessions/{id} | `get_session` | 단일 세션 (지표 포함) |
//! | DELETE | /api/v1/sessions/{id} | `delete_session` | 세션 삭제 |
//!
//! ## 사용 흐름
//! ```text
//! 1. GET  /snippets/{id}/next-index → { next_index: 120, ... }
//! 2. 클라이언트가 120번째 문자부터 연습
//! 3. POST /snippets/{id}/sessions   → 원시 카운터 전송, 지표가 담긴 응답
//! ```

use crate::{
    db,
    error::AppError,
    models::*,
    routes::AppState,
    services::metrics,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

fn with_metrics(session: TypingSession) -> SessionWithMetrics {
    SessionWithMetrics {
        metrics: metrics::compute(&session),
        session,
    }
}

/// 스니펫이 없으면 404
async fn require_snippet(state: &AppState, id: &str) -> Result<SnippetRow, AppError> {
    db::get_snippet_row(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("snippet"))
}

/// `GET /snippets/{id}/sessions` → `{ "sessions": [...] }` (최신순)
pub async fn list_snippet_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_snippet(&state, &id).await?;

    let sessions: Vec<SessionWithMetrics> = db::list_sessions_for_snippet(&state.pool, &id)
        .await?
        .into_iter()
        .map(with_metrics)
        .collect();
    Ok(Json(json!({ "sessions": sessions })))
}

/// `POST /snippets/{id}/sessions`
///
/// 요청 값이 세션 규칙을 어기면 어떤 필드가 문제인지 담아 400을 돌려줍니다.
pub async fn create_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionWithMetrics>, AppError> {
    require_snippet(&state, &id).await?;

    let session_id = uuid::Uuid::now_v7().to_string();
    let session = TypingSession::new(session_id, id, req)?;
    db::create_session(&state.pool, &session).await?;

    Ok(Json(with_metrics(session)))
}

/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionWithMetrics>, AppError> {
    let session = db::get_session(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("session"))?;
    Ok(Json(with_metrics(session)))
}

/// `DELETE /sessions/{id}` → `204 No Content`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_session(&state.pool, &id).await? {
        return Err(AppError::NotFound("session"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /snippets/{id}/next-index`
pub async fn next_index(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NextIndex>, AppError> {
    require_snippet(&state, &id).await?;
    let next = db::next_start_index(&state.pool, &id).await?;
    Ok(Json(next))
}

/// `GET /snippets/{id}/stats`
pub async fn snippet_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SnippetStats>, AppError> {
    require_snippet(&state, &id).await?;
    let sessions = db::list_sessions_for_snippet(&state.pool, &id).await?;
    Ok(Json(metrics::summarize(&id, &sessions)))
}
