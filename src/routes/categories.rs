//! # 카테고리(Category) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/categories`              → 전체 카테고리 목록
//! - `POST   /api/v1/categories`              → 새 카테고리 생성
//! - `GET    /api/v1/categories/{id}`          → 단일 카테고리 조회
//! - `PATCH  /api/v1/categories/{id}`          → 이름 변경
//! - `DELETE /api/v1/categories/{id}`          → 삭제 (소속 스니펫까지)
//! - `GET    /api/v1/categories/{id}/snippets` → 카테고리의 스니펫 목록
//!
//! 이름 검증과 중복 검사는 `db::categories`가 수행합니다.
//! 핸들러는 `Ok(None)`/`false`를 404로 바꾸는 일만 합니다.

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `GET /categories` — 응답: `{ "categories": [...] }`
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let categories = db::list_categories(&state.pool).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// `GET /categories/{id}`
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let category = db::get_category(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("category"))?;
    Ok(Json(category))
}

/// `POST /categories` + `{ "category_name": "..." }`
///
/// 이름이 이미 있으면 409 Conflict입니다.
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = db::create_category(&state.pool, &req).await?;
    Ok(Json(category))
}

/// `PATCH /categories/{id}` + `{ "category_name": "..." }`
pub async fn rename_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = db::rename_category(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound("category"))?;
    Ok(Json(category))
}

/// `DELETE /categories/{id}` → `204 No Content`
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = db::delete_category(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("category"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /categories/{id}/snippets` — 응답: `{ "snippets": [...] }`
///
/// 없는 카테고리면 빈 배열 대신 404를 돌려줍니다.
pub async fn list_category_snippets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if db::get_category(&state.pool, &id).await?.is_none() {
        return Err(AppError::NotFound("category"));
    }

    let snippets = db::list_snippets(&state.pool, &id).await?;
    Ok(Json(json!({ "snippets": snippets })))
}
