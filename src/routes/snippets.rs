//! # 스니펫(Snippet) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/snippets`     → 새 스니펫 생성 (`category_id`는 본문에)
//! - `GET    /api/v1/snippets/{id}` → 단일 스니펫 조회 (본문 재조립)
//! - `PATCH  /api/v1/snippets/{id}` → 이름/본문 수정
//! - `DELETE /api/v1/snippets/{id}` → 삭제 (조각과 세션 포함)
//!
//! 본문은 클라이언트에 항상 하나의 문자열로 보입니다.
//! 1000자 단위 분할은 저장 계층 내부의 일입니다.

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `POST /snippets` + `{ "category_id": "...", "snippet_name": "...", "content": "..." }`
///
/// 존재하지 않는 `category_id`는 404가 아니라 400(검증 실패)입니다.
/// 경로가 아니라 본문의 값이 잘못된 것이기 때문입니다.
pub async fn create_snippet(
    State(state): State<AppState>,
    Json(req): Json<CreateSnippetRequest>,
) -> Result<Json<Snippet>, AppError> {
    let snippet = db::create_snippet(&state.pool, &req).await?;
    Ok(Json(snippet))
}

/// `GET /snippets/{id}`
pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, AppError> {
    let snippet = db::get_snippet(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("snippet"))?;
    Ok(Json(snippet))
}

/// `PATCH /snippets/{id}` + `{ "snippet_name"?: "...", "content"?: "..." }`
pub async fn update_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSnippetRequest>,
) -> Result<Json<Snippet>, AppError> {
    let snippet = db::update_snippet(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound("snippet"))?;
    Ok(Json(snippet))
}

/// `DELETE /snippets/{id}` → `204 No Content`
pub async fn delete_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_snippet(&state.pool, &id).await? {
        return Err(AppError::NotFound("snippet"));
    }
    Ok(StatusCode::NO_CONTENT)
}
