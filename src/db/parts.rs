//! # 스니펫 본문 조각(part) 저장소
//!
//! `services::chunking`으로 나눈 조각을 `snippet_parts` 테이블에 저장하고,
//! part_number 순서대로 다시 이어 붙여 본문을 돌려줍니다.
//!
//! ## 연결 받기
//! 모든 함수는 `&mut SqliteConnection`을 받습니다.
//! - 트랜잭션 안에서: `&mut *tx`
//! - 단독 조회: `&mut *pool.acquire().await?`
//!
//! "기존 조각 삭제 + 새 조각 삽입"을 하나의 원자적 단위로 묶는 일은
//! 호출자(`db::snippets`)가 트랜잭션으로 처리합니다.

use crate::error::AppError;
use crate::models::SnippetPart;
use crate::services::chunking;
use sqlx::SqliteConnection;

/// 본문을 조각으로 나눠 저장합니다. 기존 조각은 먼저 모두 지웁니다.
///
/// 생성과 수정 모두 이 함수를 사용합니다. 빈 본문이면 조각이 하나도 남지 않습니다.
/// 반환값은 저장한 조각 수입니다.
pub async fn store_parts(
    conn: &mut SqliteConnection,
    snippet_id: &str,
    content: &str,
) -> Result<usize, AppError> {
    // 삭제가 끝난 뒤에 삽입을 시작해야 이전 조각이 섞이지 않습니다.
    sqlx::query("DELETE FROM snippet_parts WHERE snippet_id = ?")
        .bind(snippet_id)
        .execute(&mut *conn)
        .await?;

    let mut stored = 0;
    for (part_number, chunk) in chunking::numbered_parts(content) {
        sqlx::query("INSERT INTO snippet_parts (snippet_id, part_number, content) VALUES (?, ?, ?)")
            .bind(snippet_id)
            .bind(part_number)
            .bind(chunk)
            .execute(&mut *conn)
            .await?;
        stored += 1;
    }

    tracing::debug!(snippet_id, parts = stored, "stored snippet parts");
    Ok(stored)
}

/// 조각을 part_number 오름차순으로 이어 붙여 본문을 돌려줍니다.
///
/// 조각이 없으면 빈 문자열입니다. "없음"을 에러로 볼지는 호출자가 정합니다.
pub async fn load_content(
    conn: &mut SqliteConnection,
    snippet_id: &str,
) -> Result<String, AppError> {
    let chunks: Vec<(String,)> = sqlx::query_as(
        "SELECT content FROM snippet_parts WHERE snippet_id = ? ORDER BY part_number ASC",
    )
    .bind(snippet_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(chunks.into_iter().map(|(chunk,)| chunk).collect())
}

/// 조각 행 전체를 순서대로 조회합니다.
#[cfg(test)]
pub async fn list_parts(
    conn: &mut SqliteConnection,
    snippet_id: &str,
) -> Result<Vec<SnippetPart>, AppError> {
    let parts = sqlx::query_as::<_, SnippetPart>(
        r#"
        SELECT snippet_id, part_number, content
        FROM snippet_parts
        WHERE snippet_id = ?
        ORDER BY part_number ASC
        "#,
    )
    .bind(snippet_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(parts)
}

/// 본문 길이(문자 수)를 조각 길이의 합으로 계산합니다.
pub async fn content_length(
    conn: &mut SqliteConnection,
    snippet_id: &str,
) -> Result<i64, AppError> {
    // SQLite의 length()는 TEXT에 대해 문자 수를 돌려줍니다.
    let (total,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(length(content)), 0) FROM snippet_parts WHERE snippet_id = ?",
    )
    .bind(snippet_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// 스니펫의 모든 조각을 삭제합니다. 조각이 없어도 에러가 아닙니다.
///
/// 반환값은 삭제된 조각 수입니다.
pub async fn delete_parts(
    conn: &mut SqliteConnection,
    snippet_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM snippet_parts WHERE snippet_id = ?")
        .bind(snippet_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use sqlx::SqlitePool;

    /// 외래키를 만족하도록 카테고리와 빈 스니펫 행을 직접 만듭니다.
    async fn owner(pool: &SqlitePool) -> String {
        sqlx::query("INSERT INTO categories (category_id, category_name) VALUES ('c1', 'Cat')")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO snippets (snippet_id, category_id, snippet_name) VALUES ('s1', 'c1', 'Snip')",
        )
        .execute(pool)
        .await
        .unwrap();
        "s1".to_string()
    }

    fn lengths(parts: &[SnippetPart]) -> Vec<usize> {
        parts.iter().map(|p| p.content.chars().count()).collect()
    }

    #[tokio::test]
    async fn round_trip_for_boundary_lengths() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        for len in [0, 1, 999, 1000, 1001, 2000, 2500, 3000] {
            let content: String = (0..len)
                .map(|i| char::from(b'a' + (i % 26) as u8))
                .collect();
            store_parts(&mut conn, &id, &content).await.unwrap();
            assert_eq!(load_content(&mut conn, &id).await.unwrap(), content, "len {len}");
        }
    }

    #[tokio::test]
    async fn twenty_five_hundred_chars_make_three_parts() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        let stored = store_parts(&mut conn, &id, &"x".repeat(2500)).await.unwrap();
        assert_eq!(stored, 3);

        let parts = list_parts(&mut conn, &id).await.unwrap();
        assert_eq!(lengths(&parts), vec![1000, 1000, 500]);
        let numbers: Vec<i64> = parts.iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_empty_trailing_part() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        store_parts(&mut conn, &id, &"x".repeat(2000)).await.unwrap();
        let parts = list_parts(&mut conn, &id).await.unwrap();
        assert_eq!(lengths(&parts), vec![1000, 1000]);
    }

    #[tokio::test]
    async fn restore_replaces_previous_parts() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        store_parts(&mut conn, &id, &"a".repeat(2500)).await.unwrap();
        store_parts(&mut conn, &id, &"b".repeat(1500)).await.unwrap();

        let parts = list_parts(&mut conn, &id).await.unwrap();
        assert_eq!(lengths(&parts), vec![1000, 500]);
        assert!(parts.iter().all(|p| !p.content.contains('a')));
        assert_eq!(content_length(&mut conn, &id).await.unwrap(), 1500);
    }

    #[tokio::test]
    async fn empty_content_stores_nothing() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(store_parts(&mut conn, &id, "").await.unwrap(), 0);
        assert!(list_parts(&mut conn, &id).await.unwrap().is_empty());
        assert_eq!(load_content(&mut conn, &id).await.unwrap(), "");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        store_parts(&mut conn, &id, &"z".repeat(1200)).await.unwrap();
        assert_eq!(delete_parts(&mut conn, &id).await.unwrap(), 2);
        assert_eq!(delete_parts(&mut conn, &id).await.unwrap(), 0);
        assert_eq!(load_content(&mut conn, &id).await.unwrap(), "");
        assert_eq!(content_length(&mut conn, &id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn works_inside_a_transaction() {
        let pool = db::connect_in_memory().await.unwrap();
        let id = owner(&pool).await;

        let mut tx = pool.begin().await.unwrap();
        store_parts(&mut *tx, &id, "inside").await.unwrap();
        assert_eq!(load_content(&mut *tx, &id).await.unwrap(), "inside");
        tx.rollback().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(load_content(&mut conn, &id).await.unwrap(), "");
    }

    #[tokio::test]
    async fn parts_for_unknown_snippet_violate_foreign_key() {
        let pool = db::connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let result = store_parts(&mut conn, "missing", "text").await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
