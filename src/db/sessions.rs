//! # 타이핑 세션 데이터베이스 쿼리 모듈
//!
//! 타이핑 연습 세션의 저장, 조회, 삭제와 "다음 시작 위치" 계산을 담당합니다.
//!
//! 세션은 원시 카운터만 저장합니다. WPM/정확도 같은 지표는
//! `services::metrics`에서 조회할 때마다 다시 계산합니다.
//!
//! ## 다음 시작 위치
//! ```text
//! 최근 세션 없음                  → 0
//! 최근 세션 end < 본문 길이        → end   (이어서 치기)
//! 최근 세션 end >= 본문 길이       → 0     (처음으로 되돌아감)
//! ```

use crate::db::parts;
use crate::error::AppError;
use crate::models::{NextIndex, SessionRow, TypingSession};
use sqlx::{SqliteConnection, SqlitePool};

const SESSION_COLUMNS: &str = "session_id, snippet_id, snippet_index_start, snippet_index_end, \
     content, start_time, end_time, actual_chars, errors";

/// 검증된 세션을 저장합니다.
pub async fn create_session(pool: &SqlitePool, session: &TypingSession) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO practice_sessions
            (session_id, snippet_id, snippet_index_start, snippet_index_end,
             content, start_time, end_time, actual_chars, errors)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.session_id())
    .bind(session.snippet_id())
    .bind(session.snippet_index_start())
    .bind(session.snippet_index_end())
    .bind(session.content())
    .bind(session.start_time_text())
    .bind(session.end_time_text())
    .bind(session.actual_chars())
    .bind(session.errors())
    .execute(pool)
    .await?;

    tracing::info!(
        session_id = session.session_id(),
        snippet_id = session.snippet_id(),
        "recorded typing session"
    );
    Ok(())
}

/// ID로 세션 하나를 조회합니다.
pub async fn get_session(pool: &SqlitePool, id: &str) -> Result<Option<TypingSession>, AppError> {
    let sql = format!(
        "SELECT {} FROM practice_sessions WHERE session_id = ?",
        SESSION_COLUMNS
    );
    let row = sqlx::query_as::<_, SessionRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(TypingSession::try_from).transpose()
}

/// 스니펫의 세션들을 최신순(종료 시각 내림차순)으로 조회합니다.
pub async fn list_sessions_for_snippet(
    pool: &SqlitePool,
    snippet_id: &str,
) -> Result<Vec<TypingSession>, AppError> {
    let sql = format!(
        "SELECT {} FROM practice_sessions WHERE snippet_id = ? ORDER BY end_time DESC, rowid DESC",
        SESSION_COLUMNS
    );
    let rows = sqlx::query_as::<_, SessionRow>(&sql)
        .bind(snippet_id)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(TypingSession::try_from).collect()
}

/// 스니펫의 가장 최근 세션을 조회합니다.
pub async fn latest_session_for_snippet(
    pool: &SqlitePool,
    snippet_id: &str,
) -> Result<Option<TypingSession>, AppError> {
    let sql = format!(
        "SELECT {} FROM practice_sessions WHERE snippet_id = ? \
         ORDER BY end_time DESC, rowid DESC LIMIT 1",
        SESSION_COLUMNS
    );
    let row = sqlx::query_as::<_, SessionRow>(&sql)
        .bind(snippet_id)
        .fetch_optional(pool)
        .await?;

    row.map(TypingSession::try_from).transpose()
}

/// 세션 하나를 삭제합니다. 없으면 `false`.
pub async fn delete_session(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM practice_sessions WHERE session_id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 스니펫의 모든 세션을 삭제합니다 (스니펫 삭제 트랜잭션 안에서 사용).
pub async fn delete_sessions_for_snippet(
    conn: &mut SqliteConnection,
    snippet_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM practice_sessions WHERE snippet_id = ?")
        .bind(snippet_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// 스니펫에서 다음 연습을 시작할 위치를 계산합니다.
pub async fn next_start_index(pool: &SqlitePool, snippet_id: &str) -> Result<NextIndex, AppError> {
    // 연결은 길이 계산 동안만 빌리고 바로 풀에 돌려줍니다.
    let content_length = {
        let mut conn = pool.acquire().await?;
        parts::content_length(&mut conn, snippet_id).await?
    };
    let last_end = latest_session_for_snippet(pool, snippet_id)
        .await?
        .map(|s| s.snippet_index_end());

    let next_index = next_index_after(last_end, content_length);
    tracing::debug!(snippet_id, next_index, content_length, "computed next start index");

    Ok(NextIndex {
        snippet_id: snippet_id.to_string(),
        next_index,
        content_length,
    })
}

/// 직전 세션의 끝 위치에서 이어 가되, 본문 끝에 닿았으면 0으로 돌아갑니다.
pub fn next_index_after(last_end: Option<i64>, content_length: i64) -> i64 {
    match last_end {
        Some(end) if end < content_length => end,
        _ => 0,
    }
}
