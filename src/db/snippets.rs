//! # 스니펫 데이터베이스 쿼리 모듈
//!
//! `snippets` 테이블 CRUD입니다. 본문(content)은 이 테이블에 없고
//! `db::parts`를 통해 `snippet_parts`에 나뉘어 저장됩니다.
//!
//! ## 트랜잭션 경계
//! ```text
//! 생성: BEGIN → INSERT snippets → store_parts → COMMIT
//! 수정: BEGIN → UPDATE snippets → (content 있으면) store_parts → COMMIT
//! 삭제: BEGIN → DELETE sessions → DELETE parts → DELETE snippets → COMMIT
//! ```
//! 중간에 실패하면 트랜잭션이 drop되면서 자동으로 롤백됩니다.

use crate::db::{parts, sessions};
use crate::error::AppError;
use crate::models::*;
use crate::services::validation;
use sqlx::{SqliteConnection, SqlitePool};

/// 카테고리에 속한 스니펫들을 이름순으로 조회합니다 (본문 포함).
pub async fn list_snippets(
    pool: &SqlitePool,
    category_id: &str,
) -> Result<Vec<Snippet>, AppError> {
    let rows = sqlx::query_as::<_, SnippetRow>(
        r#"
        SELECT snippet_id, category_id, snippet_name
        FROM snippets
        WHERE category_id = ?
        ORDER BY snippet_name
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    let mut conn = pool.acquire().await?;
    let mut snippets = Vec::with_capacity(rows.len());
    for row in rows {
        let content = parts::load_content(&mut conn, &row.snippet_id).await?;
        snippets.push(Snippet::from_row(row, content));
    }

    Ok(snippets)
}

/// 본문 없이 스니펫 행만 조회합니다.
pub async fn get_snippet_row(pool: &SqlitePool, id: &str) -> Result<Option<SnippetRow>, AppError> {
    let row = sqlx::query_as::<_, SnippetRow>(
        "SELECT snippet_id, category_id, snippet_name FROM snippets WHERE snippet_id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// ID로 스니펫을 조회하고 본문을 재조립합니다.
pub async fn get_snippet(pool: &SqlitePool, id: &str) -> Result<Option<Snippet>, AppError> {
    let Some(row) = get_snippet_row(pool, id).await? else {
        return Ok(None);
    };

    let mut conn = pool.acquire().await?;
    let content = parts::load_content(&mut conn, id).await?;
    Ok(Some(Snippet::from_row(row, content)))
}

/// 같은 카테고리 안에서 이름이 일치하는 스니펫을 찾습니다.
async fn find_in_category(
    pool: &SqlitePool,
    category_id: &str,
    name: &str,
) -> Result<Option<SnippetRow>, AppError> {
    let row = sqlx::query_as::<_, SnippetRow>(
        r#"
        SELECT snippet_id, category_id, snippet_name
        FROM snippets
        WHERE category_id = ? AND snippet_name = ?
        "#,
    )
    .bind(category_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 새 스니펫을 생성합니다.
///
/// ## 에러
/// - `Validation`: 이름/본문 규칙 위반, 또는 `category_id`가 존재하지 않음
/// - `Conflict`: 같은 카테고리에 같은 이름의 스니펫이 있음
pub async fn create_snippet(
    pool: &SqlitePool,
    req: &CreateSnippetRequest,
) -> Result<Snippet, AppError> {
    let name = validation::validate_snippet_name(&req.snippet_name)?;
    validation::validate_content(&req.content)?;

    if crate::db::get_category(pool, &req.category_id).await?.is_none() {
        return Err(AppError::validation(
            "category_id",
            format!("category '{}' does not exist", req.category_id),
        ));
    }

    if find_in_category(pool, &req.category_id, &name).await?.is_some() {
        return Err(duplicate(&name));
    }

    let id = uuid::Uuid::now_v7().to_string();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO snippets (snippet_id, category_id, snippet_name) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&req.category_id)
        .bind(&name)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_unique_violation(e, duplicate_message(&name)))?;

    let stored = parts::store_parts(&mut *tx, &id, &req.content).await?;

    tx.commit().await?;
    tracing::info!(snippet_id = %id, parts = stored, "created snippet '{}'", name);

    get_snippet(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created snippet".to_string()))
}

/// 스니펫 이름 및/또는 본문을 수정합니다.
///
/// 본문이 주어지면 증분 비교 없이 기존 조각을 모두 지우고 다시 나눠 저장합니다.
///
/// ## 반환값
/// - `Ok(Some(Snippet))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 스니펫이 없음
pub async fn update_snippet(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateSnippetRequest,
) -> Result<Option<Snippet>, AppError> {
    let name = req
        .snippet_name
        .as_deref()
        .map(validation::validate_snippet_name)
        .transpose()?;
    if let Some(content) = &req.content {
        validation::validate_content(content)?;
    }

    let Some(row) = get_snippet_row(pool, id).await? else {
        return Ok(None);
    };

    if let Some(name) = &name {
        if let Some(existing) = find_in_category(pool, &row.category_id, name).await? {
            if existing.snippet_id != id {
                return Err(duplicate(name));
            }
        }
    }

    let mut tx = pool.begin().await?;
    let applied = apply_update(&mut *tx, &row, name.as_deref(), req.content.as_deref()).await?;
    if !applied {
        // 검사와 트랜잭션 사이에 다른 요청이 스니펫을 지운 경우
        tx.rollback().await?;
        return Ok(None);
    }
    tx.commit().await?;

    get_snippet(pool, id).await
}

/// 트랜잭션 안에서 이름/본문 변경을 적용합니다.
///
/// 행이 이미 사라졌으면 조각을 건드리지 않고 `false`를 돌려줍니다.
async fn apply_update(
    conn: &mut SqliteConnection,
    row: &SnippetRow,
    name: Option<&str>,
    content: Option<&str>,
) -> Result<bool, AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE snippets
        SET snippet_name = COALESCE(?, snippet_name),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE snippet_id = ?
        "#,
    )
    .bind(name)
    .bind(&row.snippet_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        AppError::from_unique_violation(e, duplicate_message(name.unwrap_or(&row.snippet_name)))
    })?;

    if updated.rows_affected() == 0 {
        return Ok(false);
    }

    if let Some(content) = content {
        let stored = parts::store_parts(&mut *conn, &row.snippet_id, content).await?;
        tracing::debug!(snippet_id = %row.snippet_id, parts = stored, "re-split snippet content");
    }

    Ok(true)
}

/// 스니펫을 삭제합니다 (세션과 조각 포함).
///
/// ## 반환값
/// - `true`: 삭제 성공
/// - `false`: 해당 ID의 스니펫이 없음
pub async fn delete_snippet(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;
    let deleted = delete_snippet_cascade(&mut *tx, id).await?;
    tx.commit().await?;

    if deleted {
        tracing::info!(snippet_id = %id, "deleted snippet");
    }
    Ok(deleted)
}

/// 외래키 순서대로 세션 → 조각 → 스니펫 행을 지웁니다.
///
/// 호출자가 연 트랜잭션 안에서 실행되며, 커밋은 호출자가 합니다.
pub(crate) async fn delete_snippet_cascade(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<bool, AppError> {
    sessions::delete_sessions_for_snippet(&mut *conn, id).await?;
    parts::delete_parts(&mut *conn, id).await?;

    let result = sqlx::query("DELETE FROM snippets WHERE snippet_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn duplicate_message(name: &str) -> String {
    format!("snippet name '{}' already exists in this category", name)
}

fn duplicate(name: &str) -> AppError {
    AppError::Conflict(duplicate_message(name))
}
