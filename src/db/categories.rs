//! # 카테고리 데이터베이스 쿼리 모듈
//!
//! `categories` 테이블에 대한 CRUD 함수들입니다.
//!
//! ## 규칙
//! - 이름은 `services::validation`으로 검증/정규화한 뒤 저장합니다.
//! - 이름은 전체에서 유일합니다 (대소문자 구분: "Alpha"와 "alpha"는 공존 가능).
//! - 카테고리를 삭제하면 소속 스니펫, 그 조각과 세션까지 한 트랜잭션에서 지웁니다.

use crate::db::snippets::delete_snippet_cascade;
use crate::error::AppError;
use crate::models::*;
use crate::services::validation;
use sqlx::SqlitePool;

/// 모든 카테고리를 이름순으로 조회합니다.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT category_id, category_name FROM categories ORDER BY category_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// ID로 카테고리 하나를 조회합니다.
pub async fn get_category(pool: &SqlitePool, id: &str) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT category_id, category_name FROM categories WHERE category_id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// 이름이 정확히 일치하는(대소문자 구분) 카테고리를 찾습니다.
pub async fn find_category_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT category_id, category_name FROM categories WHERE category_name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// 새 카테고리를 생성합니다.
///
/// ## 에러
/// - `Validation`: 이름 규칙 위반
/// - `Conflict`: 같은 이름의 카테고리가 이미 있음
pub async fn create_category(
    pool: &SqlitePool,
    req: &CreateCategoryRequest,
) -> Result<Category, AppError> {
    let name = validation::validate_category_name(&req.category_name)?;

    if find_category_by_name(pool, &name).await?.is_some() {
        return Err(duplicate(&name));
    }

    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO categories (category_id, category_name) VALUES (?, ?)")
        .bind(&id)
        .bind(&name)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, duplicate_message(&name)))?;

    tracing::info!(category_id = %id, category_name = %name, "created category");

    get_category(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created category".to_string()))
}

/// 카테고리 이름을 바꿉니다 (전체 교체).
///
/// ## 반환값
/// - `Ok(Some(Category))`: 변경 성공
/// - `Ok(None)`: 해당 ID의 카테고리가 없음
/// - `Err(Conflict)`: 다른 카테고리가 이미 그 이름을 사용 중
pub async fn rename_category(
    pool: &SqlitePool,
    id: &str,
    req: &RenameCategoryRequest,
) -> Result<Option<Category>, AppError> {
    let name = validation::validate_category_name(&req.category_name)?;

    if get_category(pool, id).await?.is_none() {
        return Ok(None);
    }

    // 자기 자신과 같은 이름으로 바꾸는 것은 허용
    if let Some(existing) = find_category_by_name(pool, &name).await? {
        if existing.category_id != id {
            return Err(duplicate(&name));
        }
    }

    sqlx::query("UPDATE categories SET category_name = ? WHERE category_id = ?")
        .bind(&name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, duplicate_message(&name)))?;

    tracing::info!(category_id = %id, category_name = %name, "renamed category");

    get_category(pool, id).await
}

/// 카테고리와 그 안의 모든 스니펫(조각, 세션 포함)을 삭제합니다.
///
/// 외래키 순서(세션 → 조각 → 스니펫 → 카테고리)대로 한 트랜잭션에서 지웁니다.
///
/// ## 반환값
/// - `true`: 삭제 성공
/// - `false`: 해당 ID의 카테고리가 없음
pub async fn delete_category(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let snippet_ids: Vec<(String,)> =
        sqlx::query_as("SELECT snippet_id FROM snippets WHERE category_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    for (snippet_id,) in &snippet_ids {
        delete_snippet_cascade(&mut *tx, snippet_id).await?;
    }

    let result = sqlx::query("DELETE FROM categories WHERE category_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // 존재하지 않는 카테고리: 아무것도 지워지지 않았으므로 되돌릴 것도 없음
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    tracing::info!(
        category_id = %id,
        snippets = snippet_ids.len(),
        "deleted category"
    );
    Ok(true)
}

fn duplicate_message(name: &str) -> String {
    format!("category name '{}' already exists", name)
}

fn duplicate(name: &str) -> AppError {
    AppError::Conflict(duplicate_message(name))
}
